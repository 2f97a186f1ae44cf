#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    FEAT,
    NOOP,
    MODE,
    TYPE,
    PASV,
    EPSV,
    RETR,
    PWD,
    CWD,
    CDUP,
    LIST,
    MDTM,
    SIZE,
    SYST,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "FEAT" => Some(FtpCommand::FEAT),
            "NOOP" => Some(FtpCommand::NOOP),
            "MODE" => Some(FtpCommand::MODE),
            "TYPE" => Some(FtpCommand::TYPE),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "RETR" => Some(FtpCommand::RETR),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "LIST" => Some(FtpCommand::LIST),
            "MDTM" => Some(FtpCommand::MDTM),
            "SIZE" => Some(FtpCommand::SIZE),
            "SYST" => Some(FtpCommand::SYST),
            _ => None,
        }
    }
}

/// One control-channel line: the verb, uppercased, and the argument as the
/// client sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: String,
}

impl Command {
    /// Splits `line` on its first space. The argument keeps inner spaces
    /// and case, only the line terminator is stripped.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let (verb, args) = line.split_once(' ').unwrap_or((line, ""));
        Self {
            verb: verb.trim().to_ascii_uppercase(),
            args: args.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_argument_verbatim() {
        let cmd = Command::parse("retr /Pub/My File.TXT\r\n");
        assert_eq!(cmd.verb, "RETR");
        assert_eq!(cmd.args, "/Pub/My File.TXT");
    }

    #[test]
    fn test_parse_without_argument() {
        let cmd = Command::parse("pwd\r\n");
        assert_eq!(cmd.verb, "PWD");
        assert_eq!(cmd.args, "");

        let cmd = Command::parse("NOOP\n");
        assert_eq!(cmd.verb, "NOOP");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(FtpCommand::from_str("epsv"), Some(FtpCommand::EPSV));
        assert_eq!(FtpCommand::from_str("STOR"), None);
    }
}
