use actix_web::{
    HttpResponse, ResponseError,
    http::StatusCode,
};
use std::borrow::Cow;

use crate::ENV;

/// Errors that cross the HTTP boundary. Every response body carries a stable
/// machine-readable `error` code next to the human message.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {message}")]
    BadRequest { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Unauthorized: {message}")]
    Unauthorized { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Forbidden: {message}")]
    Forbidden { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Not Found: {message}")]
    NotFound { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Conflict: {message}")]
    Conflict { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    pub error: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::BadRequest { code: code.into(), message: msg.into() }
    }

    pub fn unauthorized(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Unauthorized { code: code.into(), message: msg.into() }
    }

    pub fn forbidden(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Forbidden { code: code.into(), message: msg.into() }
    }

    pub fn not_found(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::NotFound { code: code.into(), message: msg.into() }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let header = ("Access-Control-Allow-Origin", ENV.frontend_url.as_str());
        let mut res = HttpResponse::build(self.status_code());

        res.insert_header(header);
        res.insert_header(("Access-Control-Allow-Credentials", "true"));

        match self {
            Error::BadRequest { code, message }
            | Error::Unauthorized { code, message }
            | Error::Forbidden { code, message }
            | Error::NotFound { code, message }
            | Error::Conflict { code, message } => {
                res.json(ErrorBody { message: message.clone(), error: code.clone() })
            }
            Error::InternalServer => res.json(ErrorBody {
                message: "Internal Server Error".into(),
                error: "internal_error".into(),
            }),
        }
    }
}

/// Infrastructure-level failures. Domain services return these for anything
/// coming out of the store or the crypto/token layers; the custom variants
/// carry the same code + message pair the HTTP layer serializes.
#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("Hash Error")]
    HashError(#[from] argon2::password_hash::Error),
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Bad Request: {message}")]
    BadRequest { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Unauthorized: {message}")]
    Unauthorized { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Database Not Found: {message}")]
    NotFound { code: Cow<'static, str>, message: Cow<'static, str> },
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(m) = meta else {
        return "Duplicate value".into();
    };

    let Some(constraint) = &m.constraint else {
        return "Duplicate value".into();
    };

    let field = constraint.split('_').next_back().unwrap_or("value");

    let mut chars = field.chars();
    let field = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{field} already exists").into()
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest { code, message } => Error::BadRequest { code, message },
            SystemError::Unauthorized { code, message } => Error::Unauthorized { code, message },
            SystemError::NotFound { code, message } => Error::NotFound { code, message },
            SystemError::Conflict(meta) => {
                Error::Conflict { code: "conflict".into(), message: conflict_message(&meta) }
            }
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return SystemError::Conflict(Some(DbErrorMeta {
                        code: db_err.code().map(|s| s.to_string()),
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }));
                }
                Some("42P01") => {
                    return SystemError::NotFound {
                        code: "not_found".into(),
                        message: "Resource not found".into(),
                    };
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn bad_request(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::BadRequest { code: code.into(), message: msg.into() }
    }

    pub fn unauthorized(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Unauthorized { code: code.into(), message: msg.into() }
    }

    pub fn not_found(
        code: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::NotFound { code: code.into(), message: msg.into() }
    }
}
