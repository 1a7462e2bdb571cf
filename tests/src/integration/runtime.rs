//! # Runtime Flows
//!
//! The `nominate-client` wiring over in-memory adapters: configuration in,
//! trigger sources started, rounds run until shutdown or a fatal error.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use clap::Parser;
    use nc_01_chain_gateway::{GatewayError, InMemoryChain};
    use nc_03_round_orchestrator::RoundError;
    use nominate_runtime::{run_with, Adapters, Cli, FileConfig, RuntimeConfig};

    use crate::fixtures::chain;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["nominate-client"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn adapters(chain: &Arc<InMemoryChain>) -> Adapters {
        Adapters {
            gateway: chain.clone(),
            submitter: chain.clone(),
            events: chain.clone(),
        }
    }

    fn runtime_config(args: &[&str], policy: &str) -> RuntimeConfig {
        let file = FileConfig::parse(policy).unwrap();
        RuntimeConfig::build(&parse(args), "//Eve".into(), &file).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_and_era_change_together() {
        let chain = chain(20, 10);
        let config = runtime_config(
            &["--trigger", "both", "-t", "60000"],
            "[selection]\nmax_validators = 4\n",
        );

        let driver = {
            let chain = chain.clone();
            async move {
                // first tick at 60s nominates era 10
                tokio::time::sleep(Duration::from_secs(61)).await;
                chain.advance_era(11);
                tokio::time::sleep(Duration::from_secs(1)).await;
                chain.emit_era(11);
                tokio::time::sleep(Duration::from_secs(100)).await;
            }
        };

        let result = run_with(&config, adapters(&chain), driver, std::future::pending()).await;
        assert_eq!(result, Ok(()));

        let submissions = chain.submissions();
        assert_eq!(submissions.len(), 2);
        assert!(submissions.iter().all(|s| s.call.len() == 4));
        assert_eq!(
            submissions.iter().map(|s| s.nonce).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_never_submits() {
        let chain = chain(5, 10);
        let config = runtime_config(&["--dry-run", "-t", "1000"], "");

        let shutdown = tokio::time::sleep(Duration::from_millis(3500));
        let result = run_with(&config, adapters(&chain), shutdown, std::future::pending()).await;

        assert_eq!(result, Ok(()));
        assert!(chain.submissions().is_empty());
        assert_eq!(chain.nonce_queries(), 0);
        // every tick gathers because dry runs leave the era open
        assert_eq!(chain.stash_queries(), 3);
    }

    #[tokio::test]
    async fn test_lost_connection_is_fatal() {
        let chain = chain(5, 10);
        let config = runtime_config(&[], "");
        let disconnected = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            GatewayError::Disconnected("ws://127.0.0.1:9944".into())
        };

        let result = run_with(&config, adapters(&chain), std::future::pending(), disconnected).await;
        assert_eq!(
            result,
            Err(RoundError::ConnectivityLost("ws://127.0.0.1:9944".into()))
        );
    }

    #[tokio::test]
    async fn test_invalid_policy_is_rejected_before_running() {
        let file = FileConfig::parse("[scoring]\nera_window = 0\n").unwrap();
        assert!(RuntimeConfig::build(&parse(&[]), "//Eve".into(), &file).is_err());
    }
}
