//! IPC protocol between the UI process and the parameter host.
//!
//! Calls carry loosely-typed argument lists, the way a web view hands its
//! bound functions a list of script values. The host checks the argument
//! count and coerces numbers itself.

use paramlink_core::{ParameterIndex, ParameterValue};
use serde::{Deserialize, Serialize};

/// Largest frame either side accepts.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// One call argument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WireValue {
    Int(i64),
    Float(f64),
}

impl WireValue {
    /// Numeric value; integers are widened to float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            WireValue::Int(v) => v as f64,
            WireValue::Float(v) => v,
        }
    }

    /// Parameter index, if this is a non-negative integer that fits.
    pub fn as_index(&self) -> Option<ParameterIndex> {
        match *self {
            WireValue::Int(v) => ParameterIndex::try_from(v).ok(),
            WireValue::Float(_) => None,
        }
    }
}

impl From<ParameterIndex> for WireValue {
    fn from(index: ParameterIndex) -> Self {
        WireValue::Int(index as i64)
    }
}

impl From<ParameterValue> for WireValue {
    fn from(value: ParameterValue) -> Self {
        WireValue::Float(value)
    }
}

/// Messages from the UI to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiMessage {
    /// `hostGetParameter(index)`
    GetParameter { request_id: u64, args: Vec<WireValue> },
    /// `hostSetParameter(index, value)`
    SetParameter { request_id: u64, args: Vec<WireValue> },
    Shutdown,
}

impl UiMessage {
    pub fn get_parameter(request_id: u64, index: ParameterIndex) -> Self {
        UiMessage::GetParameter {
            request_id,
            args: vec![index.into()],
        }
    }

    pub fn set_parameter(request_id: u64, index: ParameterIndex, value: ParameterValue) -> Self {
        UiMessage::SetParameter {
            request_id,
            args: vec![index.into(), value.into()],
        }
    }
}

/// Messages from the host to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostMessage {
    /// Reply to `GetParameter`.
    Value { request_id: u64, value: ParameterValue },
    /// Reply to `SetParameter`.
    Ack { request_id: u64 },
    /// Either call was rejected.
    Error { request_id: u64, message: String },
    /// Unsolicited: the parameter changed outside the UI.
    ParameterChanged {
        index: ParameterIndex,
        value: ParameterValue,
    },
}

/// Decode `hostGetParameter` arguments: exactly one integer index.
pub fn decode_get_args(args: &[WireValue]) -> Result<ParameterIndex, String> {
    match args {
        [index] => index
            .as_index()
            .ok_or_else(|| format!("invalid parameter index {index:?}")),
        _ => Err(format!("getParameter expects 1 argument, got {}", args.len())),
    }
}

/// Decode `hostSetParameter` arguments: an integer index and a number.
pub fn decode_set_args(args: &[WireValue]) -> Result<(ParameterIndex, ParameterValue), String> {
    match args {
        [index, value] => {
            let index = index
                .as_index()
                .ok_or_else(|| format!("invalid parameter index {index:?}"))?;
            Ok((index, value.as_f64()))
        }
        _ => Err(format!("setParameter expects 2 arguments, got {}", args.len())),
    }
}
