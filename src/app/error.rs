use std::process::ExitCode;

use crate::Error;
use crate::receptor::ReceptorError;

pub fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::AppAlreadyRunning { .. } => ExitCode::from(73),
        Error::AppNotStarted { .. } => ExitCode::from(66),
        Error::Receptor(ReceptorError::Api { .. }) => ExitCode::from(70),
        Error::Receptor(ReceptorError::Transport { .. }) => ExitCode::from(69),
        Error::Receptor(ReceptorError::Decode { .. }) => ExitCode::from(76),
        Error::StartTimedOut { .. } => ExitCode::from(75),
        Error::NoTarget => ExitCode::from(78),
        Error::ReadConfig { .. } => ExitCode::from(74),
        Error::ParseConfig { .. } => ExitCode::from(65),
        Error::InvalidConfig { .. } => ExitCode::from(65),
        Error::SerializeConfig { .. } => ExitCode::from(70),
        Error::CreateDir { .. } => ExitCode::from(73),
        Error::WriteConfig { .. } => ExitCode::from(74),
        Error::Output { .. } => ExitCode::from(74),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn exit_code_matches_expected_values() {
        assert_eq!(
            exit_code(&Error::AppAlreadyRunning {
                process_guid: "web".into()
            }),
            ExitCode::from(73)
        );
        assert_eq!(
            exit_code(&Error::AppNotStarted {
                process_guid: "web".into()
            }),
            ExitCode::from(66)
        );
        assert_eq!(
            exit_code(&Error::Receptor(ReceptorError::api(500, "boom"))),
            ExitCode::from(70)
        );
        assert_eq!(
            exit_code(&Error::Receptor(ReceptorError::Transport {
                url: "http://receptor.lattice.dev".into(),
                message: "refused".into()
            })),
            ExitCode::from(69)
        );
        assert_eq!(
            exit_code(&Error::StartTimedOut {
                process_guid: "web".into(),
                waited_secs: 30
            }),
            ExitCode::from(75)
        );
        assert_eq!(exit_code(&Error::NoTarget), ExitCode::from(78));
        assert_eq!(
            exit_code(&Error::ParseConfig {
                path: "file".into(),
                source: toml::from_str::<toml::Value>("invalid").unwrap_err()
            }),
            ExitCode::from(65)
        );
        assert_eq!(
            exit_code(&Error::CreateDir {
                path: "dir".into(),
                source: io::Error::new(io::ErrorKind::Other, "err")
            }),
            ExitCode::from(73)
        );
        assert_eq!(
            exit_code(&Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))),
            ExitCode::from(74)
        );
    }
}
