//! # osvalues
//!
//! Command-line front end of the OpenStack provisioning values engine.
//!
//! ## Usage
//!
//! ```bash
//! # Terraform variables for a cluster
//! osvalues terraform-vars --infrastructure-config infra.yaml --cloud-profile profile.yaml \
//!     --region eu-de-1 --namespace shoot--dev--test --ssh-public-key id_rsa.pub
//!
//! # Infrastructure status from an applied Terraform run
//! osvalues status --infrastructure-config infra.yaml --terraform-dir ./state
//!
//! # Chart values from manifests
//! osvalues chart-values --control-plane-config cp.yaml --cloud-profile profile.yaml \
//!     --infrastructure-status status.yaml --cluster cluster.yaml --secrets secrets.yaml \
//!     --region eu-de-1 --namespace shoot--dev--test
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use k8s_openapi::api::core::v1::Secret;
use openstack_provisioning_values::apis::{
    CloudProfileConfig, ControlPlaneConfig, InfrastructureConfig, InfrastructureStatus,
};
use openstack_provisioning_values::collaborators::{
    flatten_outputs, KubeSecretReader, ManifestSecretReader, OutputEntry, SecretReader, SecretRef,
    StateOutputReader, TerraformOutputReader,
};
use openstack_provisioning_values::config::EngineConfig;
use openstack_provisioning_values::constants::{
    CLOUD_PROVIDER_CONFIG_NAME, CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME, SECRET_NAME_CLOUD_PROVIDER,
};
use openstack_provisioning_values::controlplane::{
    compute_secret_checksum, ClusterConstraints, ControlPlaneInputs, ValuesProvider,
};
use openstack_provisioning_values::infrastructure::{
    build_terraform_variables, compute_status, InfrastructureRequest,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// OpenStack provisioning values engine
#[derive(Parser)]
#[command(name = "osvalues")]
#[command(about = "Resolve OpenStack provisioning values and chart values", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Terraform variables for a cluster as JSON
    TerraformVars {
        /// InfrastructureConfig (YAML or JSON)
        #[arg(long)]
        infrastructure_config: PathBuf,

        /// CloudProfileConfig (YAML or JSON)
        #[arg(long)]
        cloud_profile: PathBuf,

        /// Target region
        #[arg(long)]
        region: String,

        /// Cluster namespace, used as cluster name
        #[arg(long)]
        namespace: String,

        /// File holding the SSH public key of the worker nodes
        #[arg(long)]
        ssh_public_key: Option<PathBuf>,

        /// Keystone domain of the cluster's credentials
        #[arg(long)]
        domain: Option<String>,
    },
    /// Print the infrastructure status of an applied Terraform run as YAML
    Status {
        /// InfrastructureConfig (YAML or JSON)
        #[arg(long)]
        infrastructure_config: PathBuf,

        /// Directory holding the Terraform state
        #[arg(long, conflicts_with = "outputs", required_unless_present = "outputs")]
        terraform_dir: Option<PathBuf>,

        /// Saved output of `terraform output -json`
        #[arg(long)]
        outputs: Option<PathBuf>,
    },
    /// Print config, control plane, shoot and storage class chart values as JSON
    ChartValues {
        /// ControlPlaneConfig (YAML or JSON)
        #[arg(long)]
        control_plane_config: PathBuf,

        /// CloudProfileConfig (YAML or JSON)
        #[arg(long)]
        cloud_profile: PathBuf,

        /// InfrastructureStatus (YAML or JSON)
        #[arg(long)]
        infrastructure_status: PathBuf,

        /// ClusterConstraints (YAML or JSON)
        #[arg(long)]
        cluster: PathBuf,

        /// Secret manifests (multi-document YAML)
        #[arg(long, conflicts_with = "from_cluster", required_unless_present = "from_cluster")]
        secrets: Option<PathBuf>,

        /// Read secrets from the current Kubernetes context instead of manifests
        #[arg(long)]
        from_cluster: bool,

        /// Known secret checksums (YAML map of secret name to checksum)
        #[arg(long)]
        checksums: Option<PathBuf>,

        /// CA bundle of the snapshot validation webhook
        #[arg(long)]
        webhook_ca_bundle: Option<PathBuf>,

        /// Target region
        #[arg(long)]
        region: String,

        /// Control plane namespace (defaults to POD_NAMESPACE)
        #[arg(long)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    initialize_logging(&config);

    debug!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    let cli = Cli::parse();
    match cli.command {
        Commands::TerraformVars {
            infrastructure_config,
            cloud_profile,
            region,
            namespace,
            ssh_public_key,
            domain,
        } => {
            let infrastructure_config: InfrastructureConfig = read_document(&infrastructure_config)?;
            let cloud_profile: CloudProfileConfig = read_document(&cloud_profile)?;
            let ssh_public_key = match ssh_public_key {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
                    .trim()
                    .to_string(),
                None => String::new(),
            };

            let mut request = InfrastructureRequest::new(region, namespace, ssh_public_key);
            request.max_api_call_retries = config.max_api_call_retries;
            request.domain = domain;

            let variables =
                build_terraform_variables(&request, &infrastructure_config, &cloud_profile)
                    .context("Failed to build Terraform variables")?;
            println!("{}", serde_json::to_string_pretty(&variables)?);
        }
        Commands::Status {
            infrastructure_config,
            terraform_dir,
            outputs,
        } => {
            let infrastructure_config: InfrastructureConfig = read_document(&infrastructure_config)?;
            let status = match (terraform_dir, outputs) {
                (Some(dir), _) => {
                    let reader = TerraformOutputReader::new(dir)
                        .with_binary(config.terraform_binary.clone());
                    compute_status(&reader, &infrastructure_config).await
                }
                (None, Some(path)) => {
                    let reader = OutputsFile::load(&path)?;
                    compute_status(&reader, &infrastructure_config).await
                }
                (None, None) => anyhow::bail!("either --terraform-dir or --outputs is required"),
            }
            .context("Failed to compute infrastructure status")?;

            info!("Infrastructure status computed for network {}", status.networks.id);
            print!("{}", serde_yaml::to_string(&status)?);
        }
        Commands::ChartValues {
            control_plane_config,
            cloud_profile,
            infrastructure_status,
            cluster,
            secrets,
            from_cluster,
            checksums,
            webhook_ca_bundle,
            region,
            namespace,
        } => {
            let control_plane_config: ControlPlaneConfig = read_document(&control_plane_config)?;
            let cloud_profile: CloudProfileConfig = read_document(&cloud_profile)?;
            let status: InfrastructureStatus = read_document(&infrastructure_status)?;
            let cluster: ClusterConstraints = read_document(&cluster)?;
            let checksums: BTreeMap<String, String> = match checksums {
                Some(path) => read_document(&path)?,
                None => BTreeMap::new(),
            };
            let webhook_ca_bundle = match webhook_ca_bundle {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => String::new(),
            };
            let namespace = namespace.unwrap_or_else(|| config.namespace.clone());

            let inputs = ControlPlaneInputs {
                namespace: &namespace,
                region: &region,
                config: &control_plane_config,
                status: &status,
                cloud_profile: &cloud_profile,
                cluster: &cluster,
            };

            let values = if from_cluster {
                rustls::crypto::ring::default_provider()
                    .install_default()
                    .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {e:?}"))?;
                let client = kube::Client::try_default()
                    .await
                    .context("Failed to create Kubernetes client")?;
                let reader = KubeSecretReader::new(client);
                compose_chart_values(reader, &config, &inputs, checksums, &webhook_ca_bundle).await?
            } else {
                let path = secrets.context("--secrets is required without --from-cluster")?;
                let reader =
                    ManifestSecretReader::from_secrets(read_secrets(&path)?, &namespace);
                compose_chart_values(reader, &config, &inputs, checksums, &webhook_ca_bundle).await?
            };
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
    }

    Ok(())
}

fn initialize_logging(config: &EngineConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("openstack_provisioning_values={},osvalues={}", config.log_level, config.log_level)
            .into()
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Compose all value trees, computing checksums of readable secrets
/// that were not supplied
async fn compose_chart_values<R: SecretReader>(
    reader: R,
    config: &EngineConfig,
    inputs: &ControlPlaneInputs<'_>,
    mut checksums: BTreeMap<String, String>,
    webhook_ca_bundle: &str,
) -> Result<serde_json::Value> {
    let depended_on = [
        (SECRET_NAME_CLOUD_PROVIDER, config.cloud_provider_secret_name.as_str()),
        (CLOUD_PROVIDER_CONFIG_NAME, CLOUD_PROVIDER_CONFIG_NAME),
        (CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME, CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME),
    ];
    for (checksum_name, secret_name) in depended_on {
        if checksums.contains_key(checksum_name) {
            continue;
        }
        match reader
            .get_secret(&SecretRef::new(secret_name, inputs.namespace))
            .await
        {
            Ok(data) => {
                checksums.insert(checksum_name.to_string(), compute_secret_checksum(&data)?);
            }
            Err(e) => warn!("No checksum for {}: {}", checksum_name, e),
        }
    }

    let provider =
        ValuesProvider::new(reader).with_secret_name(config.cloud_provider_secret_name.clone());

    let config_values = provider
        .get_config_chart_values(inputs)
        .await
        .context("Failed to compose config chart values")?;
    let control_plane_values = provider
        .get_control_plane_chart_values(inputs, &checksums)
        .await
        .context("Failed to compose control plane chart values")?;
    let shoot_values = provider
        .get_shoot_chart_values(inputs, &checksums, webhook_ca_bundle)
        .await
        .context("Failed to compose shoot chart values")?;

    let storage_classes_values = provider.get_storage_classes_chart_values(inputs);

    Ok(json!({
        "config": config_values,
        "controlPlane": control_plane_values,
        "shoot": shoot_values,
        "storageClasses": storage_classes_values,
    }))
}

/// Outputs saved from `terraform output -json`
struct OutputsFile {
    entries: BTreeMap<String, OutputEntry>,
}

impl OutputsFile {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let entries = serde_json::from_slice(&content)
            .with_context(|| format!("Failed to parse Terraform outputs in {}", path.display()))?;
        Ok(Self { entries })
    }
}

#[async_trait]
impl StateOutputReader for OutputsFile {
    async fn get_state_output_variables(
        &self,
        keys: &[&str],
    ) -> openstack_provisioning_values::Result<HashMap<String, String>> {
        Ok(flatten_outputs(&self.entries, keys))
    }
}

/// Read a single YAML (or JSON) document
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read all secrets of a multi-document YAML file
fn read_secrets(path: &Path) -> Result<Vec<Secret>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut secrets = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if value.is_null() {
            continue;
        }
        let secret: Secret = serde_yaml::from_value(value)
            .with_context(|| format!("Failed to parse secret in {}", path.display()))?;
        secrets.push(secret);
    }
    debug!("Loaded {} secrets from {}", secrets.len(), path.display());
    Ok(secrets)
}
