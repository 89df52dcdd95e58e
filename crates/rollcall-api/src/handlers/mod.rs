//! Route handlers.
//!
//! | Method   | Path                   | Auth   |
//! |----------|------------------------|--------|
//! | `GET`    | `/api/status`          | public |
//! | `POST`   | `/api/enroll`          | public |
//! | `POST`   | `/api/signin`          | public |
//! | `GET`    | `/api/identities`      | admin  |
//! | `DELETE` | `/api/identities/{id}` | admin  |
//! | `GET`    | `/api/attendance`      | admin  |
//! | `GET`    | `/api/photos/{asset}`  | admin  |

mod attendance;
mod enroll;
mod identities;
mod photos;
mod signin;

pub use attendance::list_attendance;
pub use enroll::enroll;
pub use identities::{delete_identity, list_identities};
pub use photos::get_photo;
pub use signin::signin;

use axum::Json;
use serde_json::{Value, json};

/// `GET /api/status` — liveness and version probe; no auth, no store.
pub async fn status() -> Json<Value> {
  Json(json!({
    "service": "rollcall",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}
