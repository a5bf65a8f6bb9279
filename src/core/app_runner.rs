//! Lifecycle controller for desired LRPs.
//!
//! Every mutation re-reads desired state from the receptor before acting. The
//! check and the mutation are separate round trips, so a concurrent client can
//! still slip in between them; that window is accepted and nothing is retried.

use log::info;

use crate::error::{Error, Result};
use crate::receptor::{
    Action, ActualLrpState, DesiredLrpCreateRequest, DesiredLrpUpdateRequest, DownloadAction,
    EnvironmentVariable, ReceptorClient, RunAction,
};

use super::options::StartAppParams;

/// LRP domain every app is desired under.
pub const LRP_DOMAIN: &str = "diego-edge";
pub const LRP_STACK: &str = "lucid64";
pub const APP_LOG_SOURCE: &str = "APP";
pub const HEALTH_LOG_SOURCE: &str = "HEALTH";
/// Launcher bundle staged into the container before the start command runs.
pub const CIRCUS_DOWNLOAD_URL: &str =
    "http://file_server.service.dc1.consul:8080/v1/static/docker-circus/docker-circus.tgz";
pub const CIRCUS_DESTINATION: &str = "/tmp";
/// Health probe shipped inside the circus bundle.
pub const HEALTH_PROBE_PATH: &str = "/tmp/spy";
pub const PORT_ENV_VAR: &str = "PORT";

pub struct AppRunner<C> {
    client: C,
    system_domain: String,
}

impl<C: ReceptorClient> AppRunner<C> {
    pub fn new(client: C, system_domain: impl Into<String>) -> Self {
        Self {
            client,
            system_domain: system_domain.into(),
        }
    }

    pub fn system_domain(&self) -> &str {
        &self.system_domain
    }

    /// Route assigned to `process_guid`.
    pub fn route_for(&self, process_guid: &str) -> String {
        format!("{process_guid}.{}", self.system_domain)
    }

    /// Desire a single instance of a new app.
    pub fn start_app(&self, params: StartAppParams) -> Result<()> {
        if self.desired_lrp_exists(&params.process_guid)? {
            return Err(Error::AppAlreadyRunning {
                process_guid: params.process_guid,
            });
        }

        let request = self.create_request(params);
        info!(
            "desiring LRP {} ({}, {} MB memory, {} MB disk)",
            request.process_guid, request.root_fs, request.memory_mb, request.disk_mb
        );
        self.client.create_desired_lrp(request)?;
        Ok(())
    }

    /// Set the instance count of an existing app, leaving every other attribute alone.
    pub fn scale_app(&self, process_guid: &str, instances: u32) -> Result<()> {
        self.ensure_started(process_guid)?;

        info!("scaling LRP {process_guid} to {instances} instance(s)");
        self.client.update_desired_lrp(
            process_guid,
            DesiredLrpUpdateRequest {
                instances: Some(instances),
            },
        )?;
        Ok(())
    }

    pub fn remove_app(&self, process_guid: &str) -> Result<()> {
        self.ensure_started(process_guid)?;

        info!("deleting LRP {process_guid}");
        self.client.delete_desired_lrp(process_guid)?;
        Ok(())
    }

    /// Whether at least one instance of `process_guid` is running.
    pub fn is_app_up(&self, process_guid: &str) -> Result<bool> {
        let actual = self.client.actual_lrps_by_process_guid(process_guid)?;
        Ok(actual
            .iter()
            .any(|lrp| lrp.state == ActualLrpState::Running))
    }

    /// Whether a desired LRP exists for `process_guid`.
    pub fn app_exists(&self, process_guid: &str) -> Result<bool> {
        self.desired_lrp_exists(process_guid)
    }

    fn desired_lrp_exists(&self, process_guid: &str) -> Result<bool> {
        let desired = self.client.desired_lrps()?;
        Ok(desired.iter().any(|lrp| lrp.process_guid == process_guid))
    }

    fn ensure_started(&self, process_guid: &str) -> Result<()> {
        if self.desired_lrp_exists(process_guid)? {
            Ok(())
        } else {
            Err(Error::AppNotStarted {
                process_guid: process_guid.to_string(),
            })
        }
    }

    fn create_request(&self, params: StartAppParams) -> DesiredLrpCreateRequest {
        let StartAppParams {
            process_guid,
            root_fs,
            start_command,
            args,
            env,
            privileged,
            memory_mb,
            disk_mb,
            port,
        } = params;

        let mut env: Vec<EnvironmentVariable> = env
            .into_iter()
            .filter(|(name, _)| name != PORT_ENV_VAR)
            .map(|(name, value)| EnvironmentVariable::new(name, value))
            .collect();
        env.push(EnvironmentVariable::new(PORT_ENV_VAR, port.to_string()));

        DesiredLrpCreateRequest {
            routes: vec![self.route_for(&process_guid)],
            log_guid: process_guid.clone(),
            process_guid,
            domain: LRP_DOMAIN.to_string(),
            root_fs,
            instances: 1,
            stack: LRP_STACK.to_string(),
            env,
            setup: Some(Action::Download(DownloadAction {
                from: CIRCUS_DOWNLOAD_URL.to_string(),
                to: CIRCUS_DESTINATION.to_string(),
            })),
            action: Action::Run(RunAction {
                path: start_command,
                args,
                privileged,
                log_source: None,
            }),
            monitor: Some(Action::Run(RunAction {
                path: HEALTH_PROBE_PATH.to_string(),
                args: vec!["-addr".to_string(), format!(":{port}")],
                privileged: false,
                log_source: Some(HEALTH_LOG_SOURCE.to_string()),
            })),
            disk_mb,
            memory_mb,
            ports: vec![u32::from(port)],
            log_source: APP_LOG_SOURCE.to_string(),
        }
    }
}
