use std::fmt::Display;

use crate::category::LogCategory;
use crate::level::LogLevel;

/// A statically-declared "known log event": category, short machine name
/// and default severity. Call sites pass one token instead of repeating
/// the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEventType {
    pub category: LogCategory,
    pub name: &'static str,
    pub level: LogLevel,
}

impl LogEventType {
    pub const fn new(category: LogCategory, name: &'static str, level: LogLevel) -> Self {
        Self {
            category,
            name,
            level,
        }
    }
}

impl Display for LogEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}:{}", self.level.to_log(), self.category, self.name)
    }
}

macro_rules! events {
    ($($(#[$doc:meta])* $const_name:ident = ($category:ident, $name:literal, $level:ident);)*) => {
        $(
            $(#[$doc])*
            pub const $const_name: LogEventType =
                LogEventType::new(LogCategory::$category, $name, LogLevel::$level);
        )*
    };
}

events! {
    /// First entry of every process run; the message carries the version.
    APP_PROCESS_START = (App, "process_start", Info);
    APP_CRASH = (App, "crash", Fatal);
    APP_UPDATE_INSTALLED = (AppUpdate, "installed", Info);

    CONN_CONNECT_TRIGGER = (ConnConnect, "trigger", Info);
    CONN_CONNECT_START = (ConnConnect, "start", Info);
    CONN_CONNECT_SUCCESS = (ConnConnect, "success", Info);
    CONN_CONNECT_ERROR = (ConnConnect, "error", Error);
    CONN_DISCONNECT_TRIGGER = (ConnDisconnect, "trigger", Info);
    CONN_SERVER_SWITCH_TRIGGER = (ConnServerSwitch, "trigger", Info);
    CONN_SERVER_SWITCH_FAILED = (ConnServerSwitch, "failed", Warn);

    LOCAL_AGENT_STATUS = (LocalAgent, "status", Info);
    LOCAL_AGENT_ERROR = (LocalAgent, "error", Error);

    USER_LOGIN = (User, "login", Info);
    USER_LOGOUT = (User, "logout", Info);
    USER_CERT_REFRESH = (UserCert, "refresh", Info);
    USER_CERT_REFRESH_ERROR = (UserCert, "refresh_error", Error);
    USER_PLAN_CHANGE = (UserPlan, "change", Info);

    API_REQUEST = (Api, "request", Debug);
    API_ERROR = (Api, "error", Warn);

    NET_CHANGED = (Net, "changed", Info);
    OS_POWER_SAVE = (Os, "power_save", Info);
    SETTINGS_CHANGED = (Settings, "changed", Info);

    /// Raw protocol traffic; never forwarded off the device.
    PROTOCOL_TRACE = (Protocol, "trace", Debug);
}
