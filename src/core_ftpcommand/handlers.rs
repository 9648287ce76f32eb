use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    auth, cdup, clnt, cwd, dele, feat, list, mdtm, mkd, noop, opts, pass, pbsz, prot, pwd, quit,
    rest, retr, rmd, rnfr, rnto, size, stor, syst, type_, user,
};
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_network::{pasv, port};
use crate::session::Session;

/// Splits a raw command line into the verb (text before the first space)
/// and the trimmed rest.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((verb, arg)) => (verb.trim(), arg.trim()),
        None => (line.trim(), ""),
    }
}

/// Routes one command through the table that matches the session's login
/// state. Replies for failures are left to the caller.
pub async fn dispatch_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    verb: &str,
    arg: &str,
) -> Result<(), FtpError> {
    let command = FtpCommand::from_str(verb);

    if !session.is_authenticated() {
        return match command {
            Some(cmd) if cmd.is_pre_auth() => run_command(cmd, writer, context, session, arg).await,
            _ => Err(FtpError::Auth("Not logged in".to_string())),
        };
    }

    match command {
        Some(cmd) if cmd.is_post_auth() => run_command(cmd, writer, context, session, arg).await,
        _ => Err(FtpError::protocol(500, "Command not implemented")),
    }
}

async fn run_command(
    command: FtpCommand,
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    match command {
        FtpCommand::USER => user::handle_user_command(writer, context, session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(writer, context, session, arg).await,
        FtpCommand::AUTH => auth::handle_auth_command(writer, context, session, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(writer, context, session, arg).await,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, context, session, arg).await,
        FtpCommand::CLNT => clnt::handle_clnt_command(writer, context, session, arg).await,
        FtpCommand::PBSZ => pbsz::handle_pbsz_command(writer, context, session, arg).await,
        FtpCommand::OPTS => opts::handle_opts_command(writer, context, session, arg).await,
        FtpCommand::PROT => prot::handle_prot_command(writer, context, session, arg).await,
        FtpCommand::FEAT => feat::handle_feat_command(writer, context, session, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, context, session, arg).await,
        FtpCommand::CDUP => cdup::handle_cdup_command(writer, context, session, arg).await,
        FtpCommand::NOOP => noop::handle_noop_command(writer, context, session, arg).await,
        FtpCommand::SIZE => size::handle_size_command(writer, context, session, arg).await,
        FtpCommand::DELE => dele::handle_dele_command(writer, context, session, arg).await,
        FtpCommand::RMD | FtpCommand::RMDA => {
            rmd::handle_rmd_command(writer, context, session, arg).await
        }
        FtpCommand::MKD => mkd::handle_mkd_command(writer, context, session, arg).await,
        FtpCommand::LIST => list::handle_list_command(writer, context, session, arg).await,
        FtpCommand::MLSD => list::handle_mlsd_command(writer, context, session, arg).await,
        FtpCommand::PORT => port::handle_port_command(writer, context, session, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, context, session, arg).await,
        FtpCommand::EPRT => port::handle_eprt_command(writer, context, session, arg).await,
        FtpCommand::EPSV => pasv::handle_epsv_command(writer, context, session, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(writer, context, session, arg).await,
        FtpCommand::REST => rest::handle_rest_command(writer, context, session, arg).await,
        FtpCommand::STOR => stor::handle_stor_command(writer, context, session, arg).await,
        FtpCommand::SYST => syst::handle_syst_command(writer, context, session, arg).await,
        FtpCommand::TYPE => type_::handle_type_command(writer, context, session, arg).await,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(writer, context, session, arg).await,
        FtpCommand::RNTO => rnto::handle_rnto_command(writer, context, session, arg).await,
        FtpCommand::MFMT | FtpCommand::MDTM => {
            mdtm::handle_mdtm_command(writer, context, session, arg).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_and_argument() {
        assert_eq!(split_command("USER john\r\n"), ("USER", "john"));
        assert_eq!(split_command("PWD\r\n"), ("PWD", ""));
        assert_eq!(split_command("STOR my file.txt \r\n"), ("STOR", "my file.txt"));
        assert_eq!(split_command("MFMT 20150215000000 mytestfile"), ("MFMT", "20150215000000 mytestfile"));
        assert_eq!(split_command("\r\n"), ("", ""));
    }
}
