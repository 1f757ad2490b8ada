use std::fmt::Display;

/// Hierarchical log category. This is the whole vocabulary external
/// consumers (log viewers, breadcrumb dashboards) may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Conn,
    ConnConnect,
    ConnDisconnect,
    ConnServerSwitch,
    LocalAgent,
    Ui,
    User,
    UserCert,
    UserPlan,
    Api,
    Net,
    Protocol,
    App,
    AppUpdate,
    Os,
    Settings,
}

impl LogCategory {
    /// Lowercase dotted form used in log lines, e.g. `conn.connect`.
    pub fn to_log(&self) -> &'static str {
        match self {
            LogCategory::Conn => "conn",
            LogCategory::ConnConnect => "conn.connect",
            LogCategory::ConnDisconnect => "conn.disconnect",
            LogCategory::ConnServerSwitch => "conn.server_switch",
            LogCategory::LocalAgent => "local_agent",
            LogCategory::Ui => "ui",
            LogCategory::User => "user",
            LogCategory::UserCert => "user.cert",
            LogCategory::UserPlan => "user.plan",
            LogCategory::Api => "api",
            LogCategory::Net => "net",
            LogCategory::Protocol => "protocol",
            LogCategory::App => "app",
            LogCategory::AppUpdate => "app.update",
            LogCategory::Os => "os",
            LogCategory::Settings => "settings",
        }
    }
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_log())
    }
}
