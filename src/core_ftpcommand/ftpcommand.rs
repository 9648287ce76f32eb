#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    AUTH,
    QUIT,
    PWD,
    CLNT,
    PBSZ,
    OPTS,
    PROT,
    FEAT,
    CWD,
    CDUP,
    NOOP,
    SIZE,
    DELE,
    RMD,
    RMDA,
    MKD,
    LIST,
    MLSD,
    PORT,
    PASV,
    EPRT,
    EPSV,
    RETR,
    REST,
    STOR,
    SYST,
    TYPE,
    RNFR,
    RNTO,
    MFMT,
    MDTM,
}

/// Accepted before login.
pub const PRE_AUTH_COMMANDS: &[FtpCommand] = &[FtpCommand::USER, FtpCommand::PASS, FtpCommand::AUTH];

/// Accepted after login, in FEAT order.
pub const POST_AUTH_COMMANDS: &[FtpCommand] = &[
    FtpCommand::QUIT,
    FtpCommand::PWD,
    FtpCommand::CLNT,
    FtpCommand::PBSZ,
    FtpCommand::OPTS,
    FtpCommand::PROT,
    FtpCommand::FEAT,
    FtpCommand::CWD,
    FtpCommand::CDUP,
    FtpCommand::NOOP,
    FtpCommand::SIZE,
    FtpCommand::DELE,
    FtpCommand::RMD,
    FtpCommand::RMDA,
    FtpCommand::MKD,
    FtpCommand::LIST,
    FtpCommand::MLSD,
    FtpCommand::PORT,
    FtpCommand::PASV,
    FtpCommand::EPRT,
    FtpCommand::EPSV,
    FtpCommand::RETR,
    FtpCommand::REST,
    FtpCommand::STOR,
    FtpCommand::SYST,
    FtpCommand::TYPE,
    FtpCommand::RNFR,
    FtpCommand::RNTO,
    FtpCommand::MFMT,
    FtpCommand::MDTM,
];

impl FtpCommand {
    /// Verbs are matched exactly; `user` is not `USER`.
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "AUTH" => Some(FtpCommand::AUTH),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "CLNT" => Some(FtpCommand::CLNT),
            "PBSZ" => Some(FtpCommand::PBSZ),
            "OPTS" => Some(FtpCommand::OPTS),
            "PROT" => Some(FtpCommand::PROT),
            "FEAT" => Some(FtpCommand::FEAT),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "NOOP" => Some(FtpCommand::NOOP),
            "SIZE" => Some(FtpCommand::SIZE),
            "DELE" => Some(FtpCommand::DELE),
            "RMD" => Some(FtpCommand::RMD),
            "RMDA" => Some(FtpCommand::RMDA),
            "MKD" => Some(FtpCommand::MKD),
            "LIST" => Some(FtpCommand::LIST),
            "MLSD" => Some(FtpCommand::MLSD),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "EPRT" => Some(FtpCommand::EPRT),
            "EPSV" => Some(FtpCommand::EPSV),
            "RETR" => Some(FtpCommand::RETR),
            "REST" => Some(FtpCommand::REST),
            "STOR" => Some(FtpCommand::STOR),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "MFMT" => Some(FtpCommand::MFMT),
            "MDTM" => Some(FtpCommand::MDTM),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::AUTH => "AUTH",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::PWD => "PWD",
            FtpCommand::CLNT => "CLNT",
            FtpCommand::PBSZ => "PBSZ",
            FtpCommand::OPTS => "OPTS",
            FtpCommand::PROT => "PROT",
            FtpCommand::FEAT => "FEAT",
            FtpCommand::CWD => "CWD",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::NOOP => "NOOP",
            FtpCommand::SIZE => "SIZE",
            FtpCommand::DELE => "DELE",
            FtpCommand::RMD => "RMD",
            FtpCommand::RMDA => "RMDA",
            FtpCommand::MKD => "MKD",
            FtpCommand::LIST => "LIST",
            FtpCommand::MLSD => "MLSD",
            FtpCommand::PORT => "PORT",
            FtpCommand::PASV => "PASV",
            FtpCommand::EPRT => "EPRT",
            FtpCommand::EPSV => "EPSV",
            FtpCommand::RETR => "RETR",
            FtpCommand::REST => "REST",
            FtpCommand::STOR => "STOR",
            FtpCommand::SYST => "SYST",
            FtpCommand::TYPE => "TYPE",
            FtpCommand::RNFR => "RNFR",
            FtpCommand::RNTO => "RNTO",
            FtpCommand::MFMT => "MFMT",
            FtpCommand::MDTM => "MDTM",
        }
    }

    pub fn is_pre_auth(&self) -> bool {
        PRE_AUTH_COMMANDS.contains(self)
    }

    pub fn is_post_auth(&self) -> bool {
        POST_AUTH_COMMANDS.contains(self)
    }
}

/// The FEAT body: every verb of both tables, `AUTH` spelled out per type.
pub fn feature_lines() -> Vec<String> {
    PRE_AUTH_COMMANDS
        .iter()
        .chain(POST_AUTH_COMMANDS.iter())
        .flat_map(|cmd| match cmd {
            FtpCommand::AUTH => vec![" AUTH TLS".to_string(), " AUTH SSL".to_string()],
            other => vec![format!(" {}", other.as_str())],
        })
        .collect()
}
