//! Per-operation authorization.
//!
//! [`authorize`] is a pure function of the caller's claims, the owner of the
//! targeted record, and the operation. Handlers call it before touching the
//! store, so a denied caller learns nothing about whether the record exists.

use crate::types::{AppError, Claims, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    CreateUser,
    ViewUser,
    UpdateUser,
    DeleteUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Valid identity, insufficient privilege (403).
    Forbidden(&'static str),
    /// The request itself is not allowed for anyone (400).
    BadRequest(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::Forbidden(msg)) => Err(AppError::Forbidden(msg.to_string())),
            Decision::Deny(Denial::BadRequest(msg)) => Err(AppError::BadRequest(msg.to_string())),
        }
    }
}

const ADMIN_REQUIRED: &str = "Admin access required";

pub fn authorize(caller: &Claims, resource_owner: Option<i64>, operation: Operation) -> Decision {
    let is_admin = caller.role.is_admin();
    let is_self = resource_owner == Some(caller.user_id);

    match operation {
        Operation::ViewUser if is_admin || is_self => Decision::Allow,
        Operation::ViewUser => {
            Decision::Deny(Denial::Forbidden("You can only view your own profile"))
        }
        Operation::DeleteUser if is_self => {
            Decision::Deny(Denial::BadRequest("You cannot delete your own account"))
        }
        Operation::ListUsers
        | Operation::CreateUser
        | Operation::UpdateUser
        | Operation::DeleteUser => {
            if is_admin {
                Decision::Allow
            } else {
                Decision::Deny(Denial::Forbidden(ADMIN_REQUIRED))
            }
        }
    }
}
