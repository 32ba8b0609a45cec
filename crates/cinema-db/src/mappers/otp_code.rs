//! Reset code model -> entity

use cinema_core::entities::OtpCode;

use crate::models::OtpCodeModel;

impl From<OtpCodeModel> for OtpCode {
    fn from(model: OtpCodeModel) -> Self {
        OtpCode {
            id: model.id,
            email: model.email,
            code: model.code,
            attempts: u32::try_from(model.attempts).unwrap_or(0),
            expires_at: model.expires_at,
            created_at: model.created_at,
            consumed_at: model.consumed_at,
            superseded_at: model.superseded_at,
        }
    }
}
