//! Session model -> entity

use cinema_core::entities::Session;

use crate::models::SessionModel;

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: model.id,
            member_id: model.member_id,
            issued_at: model.issued_at,
            expires_at: model.expires_at,
            revoked_at: model.revoked_at,
        }
    }
}
