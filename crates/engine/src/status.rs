//! Two-state status flag shared by every soft-deletable entity.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Inactive,
    #[default]
    Active,
}

impl Status {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// Interpret a status supplied by a caller.
    ///
    /// Zero counts as "not supplied", so callers can only ever request the
    /// active state; rows become inactive through soft-deletion alone.
    pub fn from_input(raw: Option<i32>) -> ResultEngine<Option<Self>> {
        match raw {
            None | Some(0) => Ok(None),
            Some(1) => Ok(Some(Self::Active)),
            Some(other) => Err(EngineError::InvalidInput(format!(
                "invalid status_id: {other}"
            ))),
        }
    }
}

impl TryFrom<i32> for Status {
    type Error = EngineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Inactive),
            1 => Ok(Self::Active),
            other => Err(EngineError::InvalidInput(format!(
                "invalid status_id: {other}"
            ))),
        }
    }
}
