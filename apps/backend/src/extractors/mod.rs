pub mod current_user;
pub mod object_id;
pub mod upload;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use object_id::ObjectId;
pub use validated_json::ValidatedJson;
