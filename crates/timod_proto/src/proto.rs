//! Package type tags and exception codes shared with the ThingsDB host.

use std::fmt;

/// Package type carried in the `tp` byte of every package header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Proto {
    /// Configuration sent by the host when the module starts
    ModuleConf = 64,
    /// Configuration accepted
    ModuleConfOk = 65,
    /// Configuration rejected
    ModuleConfErr = 66,
    /// Request from the host
    ModuleReq = 80,
    /// Successful response to a request
    ModuleRes = 81,
    /// Error response to a request
    ModuleErr = 82,
}

impl Proto {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Proto {
    type Error = u8;

    fn try_from(tp: u8) -> Result<Self, Self::Error> {
        match tp {
            64 => Ok(Proto::ModuleConf),
            65 => Ok(Proto::ModuleConfOk),
            66 => Ok(Proto::ModuleConfErr),
            80 => Ok(Proto::ModuleReq),
            81 => Ok(Proto::ModuleRes),
            82 => Ok(Proto::ModuleErr),
            other => Err(other),
        }
    }
}

/// ThingsDB exception codes a module may return in a `ModuleErr` package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Ex {
    Operation = -63,
    NumArguments = -62,
    Type = -61,
    Value = -60,
    Overflow = -59,
    ZeroDiv = -58,
    MaxQuota = -57,
    Auth = -56,
    Forbidden = -55,
    Lookup = -54,
    BadData = -53,
    Syntax = -52,
    Node = -51,
    Assert = -50,
    Internal = -1,
}

impl Ex {
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Error name as ThingsDB reports it to the caller.
    pub fn name(self) -> &'static str {
        match self {
            Ex::Operation => "OperationError",
            Ex::NumArguments => "NumArgumentsError",
            Ex::Type => "TypeError",
            Ex::Value => "ValueError",
            Ex::Overflow => "OverflowError",
            Ex::ZeroDiv => "ZeroDivError",
            Ex::MaxQuota => "MaxQuotaError",
            Ex::Auth => "AuthError",
            Ex::Forbidden => "ForbiddenError",
            Ex::Lookup => "LookupError",
            Ex::BadData => "BadDataError",
            Ex::Syntax => "SyntaxError",
            Ex::Node => "NodeError",
            Ex::Assert => "AssertionError",
            Ex::Internal => "InternalError",
        }
    }
}

impl fmt::Display for Ex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
