use crate::core_ftpcommand::ftpcommand::{Command, FtpCommand};
use crate::core_ftpcommand::{
    cdup, cwd, feat, list, mdtm, mode, noop, pass, pwd, quit, retr, size, syst, type_, user,
};
use crate::core_network::pasv;
use crate::helpers::send_response;
use crate::session::Session;
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<bool, std::io::Error>> + Send + 'a>>;

/// A command handler borrows the session for the duration of one command.
/// It returns whether the command succeeded, for logging only; an `Err`
/// means the control channel is broken.
pub type CommandHandler = for<'a> fn(&'a mut Session, String) -> HandlerFuture<'a>;

macro_rules! handler {
    ($handle:path) => {{
        fn boxed(session: &mut Session, arg: String) -> HandlerFuture<'_> {
            Box::pin($handle(session, arg))
        }
        boxed as CommandHandler
    }};
}

/// Commands available before PASS succeeds.
pub fn initialize_noauth_handlers() -> HashMap<FtpCommand, CommandHandler> {
    let mut handlers: HashMap<FtpCommand, CommandHandler> = HashMap::new();

    handlers.insert(FtpCommand::USER, handler!(user::handle_user_command));
    handlers.insert(FtpCommand::PASS, handler!(pass::handle_pass_command));
    handlers.insert(FtpCommand::QUIT, handler!(quit::handle_quit_command));
    handlers.insert(FtpCommand::FEAT, handler!(feat::handle_feat_command));
    handlers.insert(FtpCommand::NOOP, handler!(noop::handle_noop_command));

    handlers
}

/// Commands available once logged in.
pub fn initialize_auth_handlers() -> HashMap<FtpCommand, CommandHandler> {
    let mut handlers = initialize_noauth_handlers();

    handlers.insert(FtpCommand::MODE, handler!(mode::handle_mode_command));
    handlers.insert(FtpCommand::TYPE, handler!(type_::handle_type_command));
    handlers.insert(FtpCommand::PASV, handler!(pasv::handle_pasv_command));
    handlers.insert(FtpCommand::EPSV, handler!(pasv::handle_epsv_command));
    handlers.insert(FtpCommand::RETR, handler!(retr::handle_retr_command));
    handlers.insert(FtpCommand::PWD, handler!(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::CWD, handler!(cwd::handle_cwd_command));
    handlers.insert(FtpCommand::CDUP, handler!(cdup::handle_cdup_command));
    handlers.insert(FtpCommand::LIST, handler!(list::handle_list_command));
    handlers.insert(FtpCommand::MDTM, handler!(mdtm::handle_mdtm_command));
    handlers.insert(FtpCommand::SIZE, handler!(size::handle_size_command));
    handlers.insert(FtpCommand::SYST, handler!(syst::handle_syst_command));

    handlers
}

/// The two command tables of a session, picked by login state.
pub struct CommandTables {
    noauth: HashMap<FtpCommand, CommandHandler>,
    auth: HashMap<FtpCommand, CommandHandler>,
}

impl CommandTables {
    pub fn new() -> Self {
        Self {
            noauth: initialize_noauth_handlers(),
            auth: initialize_auth_handlers(),
        }
    }

    fn lookup(&self, authenticated: bool, verb: FtpCommand) -> Option<CommandHandler> {
        let table = if authenticated { &self.auth } else { &self.noauth };
        table.get(&verb).copied()
    }

    /// Runs `command` against `session`, or refuses it with 503/500.
    pub async fn dispatch(&self, session: &mut Session, command: Command) -> Result<bool, std::io::Error> {
        let verb = FtpCommand::from_str(&command.verb);

        if let Some(handler) = verb.and_then(|v| self.lookup(session.is_authenticated, v)) {
            let ok = handler(session, command.args).await?;
            debug!("{} handled, success: {}", command.verb, ok);
            return Ok(ok);
        }

        if verb.is_some_and(|v| self.auth.contains_key(&v)) {
            warn!("{} before login", command.verb);
            send_response(&mut session.writer, 503, "Login with USER first.").await?;
        } else {
            warn!("Unknown command: {}", command.verb);
            send_response(&mut session.writer, 500, "Unknown command.").await?;
        }
        Ok(false)
    }
}
