//! # Data Gathering
//!
//! Fetches everything a round needs into a [`RoundSnapshot`]. Independent
//! queries run concurrently; the first failure aborts the rest.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use futures::{StreamExt, TryStreamExt};
use nc_01_chain_gateway::{ChainDataGateway, GatewayError};
use nc_02_validator_scoring::{select_window, RoundSnapshot};
use tracing::debug;

use crate::config::OrchestratorConfig;

/// Gather a snapshot from `gateway`.
pub async fn gather_snapshot(
    gateway: &dyn ChainDataGateway,
    config: &OrchestratorConfig,
) -> Result<RoundSnapshot, GatewayError> {
    let coefficients = async {
        match config.coefficients {
            Some(static_coefficients) => Ok(static_coefficients),
            None => gateway.fetch_scoring_coefficients().await,
        }
    };
    let max_validators = async {
        match config.max_validators {
            Some(static_max) => Ok(static_max),
            None => gateway.fetch_max_validators().await,
        }
    };

    let (stashes, historic, coefficients, max_validators, token_decimals, derivative_index) = tokio::try_join!(
        gateway.list_validator_stashes(),
        gateway.list_historic_eras(config.include_current_era),
        coefficients,
        max_validators,
        gateway.token_decimals(),
        gateway.derivative_index(),
    )?;

    let eras = select_window(&historic, config.era_window);
    debug!(
        validators = stashes.len(),
        first_era = ?eras.first(),
        last_era = ?eras.last(),
        "[nc-03] Gathering validator data"
    );

    let slashes = try_join_all(eras.iter().map(|era| async move {
        gateway
            .fetch_era_slashes(*era)
            .await
            .map(|slashes| (*era, slashes.into_iter().collect()))
    }));

    let exposure_requests: Vec<_> = stashes
        .iter()
        .map(|stash| async move {
            gateway
                .fetch_exposure(stash)
                .await
                .map(|exposure| (stash.clone(), exposure))
        })
        .collect();
    let exposures = futures::stream::iter(exposure_requests)
        .buffered(config.exposure_concurrency.max(1))
        .try_collect::<BTreeMap<_, _>>();

    let (identities, accounts, era_points, slashes, exposures) = tokio::try_join!(
        gateway.fetch_identities(&stashes),
        gateway.fetch_validator_accounts(&stashes),
        gateway.fetch_era_points(&eras),
        slashes,
        exposures,
    )?;

    Ok(RoundSnapshot {
        identities: identities.into_iter().collect(),
        accounts: accounts.into_iter().collect(),
        exposures,
        era_points,
        slashes: slashes.into_iter().collect(),
        stashes,
        eras,
        coefficients,
        max_validators,
        token_decimals,
        derivative_index,
    })
}
