//! Custom request extractors.

mod current_user;
mod params;
mod post_form;
mod validated_json;

pub use current_user::{CurrentUser, MaybeUser};
pub use params::{Path, Query};
pub use post_form::{PostForm, PostPayload};
pub use validated_json::ValidatedJson;
