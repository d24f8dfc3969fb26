use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerConfig, router, run, run_with_listener, spawn_with_listener};

mod analytics;
mod batches;
mod earnings;
mod expenses;
mod exports;
mod items;
mod server;
mod uploads;
mod user;
mod views;

pub mod types {
    pub use api_types::Message;

    pub mod user {
        pub use api_types::user::{Register, Registered, Role, UserView};
    }

    pub mod batch {
        pub use api_types::batch::{
            BatchDetail, BatchList, BatchNew, BatchOwner, BatchStatus, BatchUpdate, BatchView,
        };
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseFields, ExpenseNew, ExpenseView};
    }

    pub mod earning {
        pub use api_types::earning::{EarningFields, EarningNew, EarningView};
    }

    pub mod upload {
        pub use api_types::upload::Uploaded;
    }

    pub mod analytics {
        pub use api_types::analytics::{BatchSummary, CategoryTotal, Dashboard, RangeQuery, Totals};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Upload(String),
    Export(String),
    TooLarge(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Database(_) | EngineError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_) | EngineError::InvalidName(_) | EngineError::InvalidId(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Upload(err) => {
                tracing::error!("upload failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err)
            }
            ServerError::Export(err) => (StatusCode::INTERNAL_SERVER_ERROR, err),
            ServerError::TooLarge(err) => (StatusCode::PAYLOAD_TOO_LARGE, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
