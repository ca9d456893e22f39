//! # Terraform Variables
//!
//! Builds the variable tree handed to the Terraform templates that create the
//! cluster network, and renders the template files from it.
//!
//! A resource whose ID is supplied in the infrastructure config is referenced,
//! never created.

use super::floating_subnet::find_floating_subnet;
use crate::apis::helper::{find_keystone_ca_cert, find_keystone_url};
use crate::apis::{CloudProfileConfig, InfrastructureConfig};
use crate::collaborators::TemplateRenderer;
use crate::constants::{
    DEFAULT_MAX_API_CALL_RETRIES, DEFAULT_ROUTER_ID, TERRAFORM_OUTPUT_KEY_FLOATING_NETWORK_ID,
    TERRAFORM_OUTPUT_KEY_NETWORK_ID, TERRAFORM_OUTPUT_KEY_NETWORK_NAME,
    TERRAFORM_OUTPUT_KEY_ROUTER_ID, TERRAFORM_OUTPUT_KEY_ROUTER_IP,
    TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_ID, TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_NAME,
    TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_ID, TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_NAME,
    TERRAFORM_OUTPUT_KEY_SSH_KEY_NAME, TERRAFORM_OUTPUT_KEY_SUBNET_ID,
};
use crate::error::Result;
use serde::Serialize;
use tracing::{debug, info};

/// Name of the template rendered into `main.tf`
pub const MAIN_TEMPLATE_NAME: &str = "main.tf";

const VARIABLES_TF: &str = include_str!("../../templates/variables.tf");
const TERRAFORM_TFVARS: &str = include_str!("../../templates/terraform.tfvars");

/// Per-cluster inputs that do not come from the infrastructure config
#[derive(Debug, Clone)]
pub struct InfrastructureRequest {
    pub region: String,
    /// Namespace of the cluster, used as the cluster name in OpenStack
    pub namespace: String,
    pub ssh_public_key: String,
    pub max_api_call_retries: u32,
    /// Keystone domain of the cluster's credentials, selects domain-bound pools
    pub domain: Option<String>,
}

impl InfrastructureRequest {
    pub fn new(
        region: impl Into<String>,
        namespace: impl Into<String>,
        ssh_public_key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            namespace: namespace.into(),
            ssh_public_key: ssh_public_key.into(),
            max_api_call_retries: DEFAULT_MAX_API_CALL_RETRIES,
            domain: None,
        }
    }

    /// Restrict floating pool lookups to pools offered to `domain`
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Variables for the Terraform templates
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TerraformVariables {
    pub openstack: OpenstackVariables,
    pub create: CreateFlags,
    pub dns_servers: Vec<String>,
    pub ssh_public_key: String,
    pub router: RouterVariables,
    pub cluster_name: String,
    pub networks: NetworkVariables,
    pub output_keys: OutputKeys,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenstackVariables {
    /// Rendered as a string, the template inlines it verbatim
    pub max_api_call_retries: String,
    #[serde(rename = "authURL")]
    pub auth_url: String,
    pub region: String,
    pub insecure: bool,
    pub floating_pool_name: String,
    #[serde(rename = "useCACert")]
    pub use_ca_cert: bool,
}

/// Which resources Terraform creates instead of referencing
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlags {
    pub router: bool,
    pub network: bool,
    pub share_network: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouterVariables {
    /// Quoted router ID, or the Terraform reference of the created router
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_pool_subnet: Option<String>,
    #[serde(rename = "enableSNAT", skip_serializing_if = "Option::is_none")]
    pub enable_snat: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVariables {
    pub workers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Output names the templates must export
///
/// The same table drives status reconstruction, so every key listed here is
/// required in the applied state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutputKeys {
    #[serde(rename = "routerID")]
    pub router_id: &'static str,
    #[serde(rename = "routerIP")]
    pub router_ip: &'static str,
    #[serde(rename = "networkID")]
    pub network_id: &'static str,
    pub network_name: &'static str,
    pub key_name: &'static str,
    #[serde(rename = "securityGroupID")]
    pub security_group_id: &'static str,
    pub security_group_name: &'static str,
    #[serde(rename = "floatingNetworkID")]
    pub floating_network_id: &'static str,
    #[serde(rename = "subnetID")]
    pub subnet_id: &'static str,
    #[serde(rename = "shareNetworkID", skip_serializing_if = "Option::is_none")]
    pub share_network_id: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_network_name: Option<&'static str>,
}

impl OutputKeys {
    #[must_use]
    pub fn new(share_network: bool) -> Self {
        Self {
            router_id: TERRAFORM_OUTPUT_KEY_ROUTER_ID,
            router_ip: TERRAFORM_OUTPUT_KEY_ROUTER_IP,
            network_id: TERRAFORM_OUTPUT_KEY_NETWORK_ID,
            network_name: TERRAFORM_OUTPUT_KEY_NETWORK_NAME,
            key_name: TERRAFORM_OUTPUT_KEY_SSH_KEY_NAME,
            security_group_id: TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_ID,
            security_group_name: TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_NAME,
            floating_network_id: TERRAFORM_OUTPUT_KEY_FLOATING_NETWORK_ID,
            subnet_id: TERRAFORM_OUTPUT_KEY_SUBNET_ID,
            share_network_id: share_network.then_some(TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_ID),
            share_network_name: share_network.then_some(TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_NAME),
        }
    }

    /// Every output key the applied state has to contain
    #[must_use]
    pub fn required_keys(&self) -> Vec<&'static str> {
        let mut keys = vec![
            self.key_name,
            self.router_id,
            self.router_ip,
            self.network_id,
            self.network_name,
            self.subnet_id,
            self.floating_network_id,
            self.security_group_id,
            self.security_group_name,
        ];
        keys.extend(self.share_network_id);
        keys.extend(self.share_network_name);
        keys
    }
}

impl TerraformVariables {
    /// Variables as a generic value tree for template rendering
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialization`] if the tree cannot be built.
    pub fn to_values(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the Terraform variables for one cluster
///
/// # Errors
///
/// Returns [`crate::Error::ConstraintResolution`] when the cloud profile has no
/// keystone URL for the region.
pub fn build_terraform_variables(
    request: &InfrastructureRequest,
    config: &InfrastructureConfig,
    cloud_profile: &CloudProfileConfig,
) -> Result<TerraformVariables> {
    let networks = &config.networks;

    let create_router = networks.router.is_none();
    let router_id = match &networks.router {
        Some(router) => {
            debug!("Using existing router {}", router.id);
            serde_json::to_string(&router.id)?
        }
        None => DEFAULT_ROUTER_ID.to_string(),
    };

    let floating_pool_subnet = find_floating_subnet(
        create_router,
        config.floating_pool_subnet_name.as_deref(),
        cloud_profile,
        &config.floating_pool_name,
        &request.region,
        request.domain.as_deref(),
    );

    let auth_url = find_keystone_url(cloud_profile, &request.region)?;
    let use_ca_cert = find_keystone_ca_cert(cloud_profile, &request.region).is_some();

    let create_share_network = config.share_network_enabled();
    let create = CreateFlags {
        router: create_router,
        network: networks.id.is_none(),
        share_network: create_share_network,
    };

    info!(
        "Terraform variables for {} in {}: create router={}, network={}, share network={}",
        request.namespace, request.region, create.router, create.network, create.share_network
    );

    Ok(TerraformVariables {
        openstack: OpenstackVariables {
            max_api_call_retries: request.max_api_call_retries.to_string(),
            auth_url,
            region: request.region.clone(),
            insecure: cloud_profile.keystone_force_insecure,
            floating_pool_name: config.floating_pool_name.clone(),
            use_ca_cert,
        },
        create,
        dns_servers: cloud_profile.dns_servers.clone(),
        ssh_public_key: request.ssh_public_key.clone(),
        router: RouterVariables {
            id: router_id,
            floating_pool_subnet,
            enable_snat: cloud_profile.use_snat.filter(|_| create_router),
        },
        cluster_name: request.namespace.clone(),
        networks: NetworkVariables {
            workers: config.workers_cidr().to_string(),
            id: networks.id.clone(),
        },
        output_keys: OutputKeys::new(create_share_network),
    })
}

/// Files making up the Terraform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformFiles {
    pub main: String,
    pub variables: String,
    pub tfvars: Vec<u8>,
}

/// Render `main.tf` and attach the static variable files
///
/// # Errors
///
/// Propagates renderer failures and serialization errors.
pub fn render_terraform_files(
    renderer: &impl TemplateRenderer,
    variables: &TerraformVariables,
) -> Result<TerraformFiles> {
    let main = renderer.render(MAIN_TEMPLATE_NAME, &variables.to_values()?)?;
    Ok(TerraformFiles {
        main,
        variables: VARIABLES_TF.to_string(),
        tfvars: TERRAFORM_TFVARS.as_bytes().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::{
        Constraints, FloatingPool, KeyStoneUrl, Networks, Router, ShareNetwork,
    };
    use crate::error::Error;
    use serde_json::json;

    fn cloud_profile() -> CloudProfileConfig {
        CloudProfileConfig {
            constraints: Constraints {
                floating_pools: vec![FloatingPool {
                    name: "fip".to_string(),
                    default_floating_subnet: Some("profile-subnet".to_string()),
                    ..Default::default()
                }],
            },
            dns_servers: vec!["8.8.8.8".to_string()],
            keystone_url: "https://keystone.example.com/v3".to_string(),
            ..Default::default()
        }
    }

    fn config() -> InfrastructureConfig {
        InfrastructureConfig {
            floating_pool_name: "fip".to_string(),
            floating_pool_subnet_name: None,
            networks: Networks {
                workers: "10.250.0.0/19".to_string(),
                ..Default::default()
            },
        }
    }

    fn request() -> InfrastructureRequest {
        InfrastructureRequest::new("eu-1", "shoot--foo--bar", "ssh-rsa AAAA")
    }

    #[test]
    fn test_creates_everything_by_default() {
        let vars = build_terraform_variables(&request(), &config(), &cloud_profile())
            .expect("variables");

        assert_eq!(
            vars.to_values().expect("values"),
            json!({
                "openstack": {
                    "maxApiCallRetries": "10",
                    "authURL": "https://keystone.example.com/v3",
                    "region": "eu-1",
                    "insecure": false,
                    "floatingPoolName": "fip",
                    "useCACert": false
                },
                "create": {"router": true, "network": true, "shareNetwork": false},
                "dnsServers": ["8.8.8.8"],
                "sshPublicKey": "ssh-rsa AAAA",
                "router": {
                    "id": "openstack_networking_router_v2.router.id",
                    "floatingPoolSubnet": "profile-subnet"
                },
                "clusterName": "shoot--foo--bar",
                "networks": {"workers": "10.250.0.0/19"},
                "outputKeys": {
                    "routerID": "router_id",
                    "routerIP": "router_ip",
                    "networkID": "network_id",
                    "networkName": "network_name",
                    "keyName": "key_name",
                    "securityGroupID": "security_group_id",
                    "securityGroupName": "security_group_name",
                    "floatingNetworkID": "floating_network_id",
                    "subnetID": "subnet_id"
                }
            })
        );
    }

    #[test]
    fn test_existing_router_is_quoted_and_skips_floating_subnet() {
        let mut config = config();
        config.floating_pool_subnet_name = Some("explicit".to_string());
        config.networks.router = Some(Router {
            id: "router-1".to_string(),
        });

        let vars = build_terraform_variables(&request(), &config, &cloud_profile())
            .expect("variables");
        assert!(!vars.create.router);
        assert_eq!(vars.router.id, "\"router-1\"");
        assert_eq!(vars.router.floating_pool_subnet, None);
    }

    #[test]
    fn test_domain_selects_floating_subnet() {
        let mut profile = cloud_profile();
        profile.constraints.floating_pools.push(FloatingPool {
            name: "fip".to_string(),
            domain: Some("team-a".to_string()),
            default_floating_subnet: Some("team-a-subnet".to_string()),
            ..Default::default()
        });

        let vars = build_terraform_variables(&request(), &config(), &profile).expect("variables");
        assert_eq!(vars.router.floating_pool_subnet.as_deref(), Some("profile-subnet"));

        let vars = build_terraform_variables(&request().with_domain("team-a"), &config(), &profile)
            .expect("variables");
        assert_eq!(vars.router.floating_pool_subnet.as_deref(), Some("team-a-subnet"));
    }

    #[test]
    fn test_snat_policy_only_for_created_router() {
        let mut profile = cloud_profile();
        profile.use_snat = Some(true);

        let vars =
            build_terraform_variables(&request(), &config(), &profile).expect("variables");
        assert_eq!(vars.router.enable_snat, Some(true));

        let mut config = config();
        config.networks.router = Some(Router {
            id: "router-1".to_string(),
        });
        let vars = build_terraform_variables(&request(), &config, &profile).expect("variables");
        assert!(!vars.create.router);
        assert_eq!(vars.router.enable_snat, None);
        assert!(vars.to_values().expect("values")["router"].get("enableSNAT").is_none());
    }

    #[test]
    fn test_existing_network_and_share_network() {
        let mut config = config();
        config.networks.id = Some("net-1".to_string());
        config.networks.share_network = Some(ShareNetwork { enabled: true });

        let vars = build_terraform_variables(&request(), &config, &cloud_profile())
            .expect("variables");
        assert!(!vars.create.network);
        assert!(vars.create.share_network);
        assert_eq!(vars.networks.id.as_deref(), Some("net-1"));
        assert_eq!(vars.output_keys.share_network_id, Some("share_network_id"));
        assert_eq!(vars.output_keys.required_keys().len(), 11);
    }

    #[test]
    fn test_snat_and_regional_ca() {
        let mut profile = cloud_profile();
        profile.keystone_url = String::new();
        profile.use_snat = Some(false);
        profile.keystone_force_insecure = true;
        profile.keystone_urls = vec![KeyStoneUrl {
            region: "eu-1".to_string(),
            url: "https://eu-1.example.com".to_string(),
            ca_cert: Some("---CA---".to_string()),
        }];

        let vars = build_terraform_variables(&request(), &config(), &profile).expect("variables");
        assert_eq!(vars.router.enable_snat, Some(false));
        assert_eq!(vars.openstack.auth_url, "https://eu-1.example.com");
        assert!(vars.openstack.use_ca_cert);
        assert!(vars.openstack.insecure);

        profile.keystone_urls[0].ca_cert = None;
        profile.keystone_ca_cert = Some("---GLOBAL CA---".to_string());
        let vars = build_terraform_variables(&request(), &config(), &profile).expect("variables");
        assert!(vars.openstack.use_ca_cert);
    }

    #[test]
    fn test_missing_keystone_url_fails() {
        let mut profile = cloud_profile();
        profile.keystone_url = String::new();

        let result = build_terraform_variables(&request(), &config(), &profile);
        assert!(matches!(
            result,
            Err(Error::ConstraintResolution { ref region, .. }) if region == "eu-1"
        ));
    }

    struct EchoRenderer;

    impl TemplateRenderer for EchoRenderer {
        fn render(&self, template: &str, values: &serde_json::Value) -> Result<String> {
            Ok(format!("# {template}\n{}", values["clusterName"]))
        }
    }

    #[test]
    fn test_render_terraform_files() {
        let vars = build_terraform_variables(&request(), &config(), &cloud_profile())
            .expect("variables");
        let files = render_terraform_files(&EchoRenderer, &vars).expect("files");
        assert_eq!(files.main, "# main.tf\n\"shoot--foo--bar\"");
        assert!(files.variables.contains("variable \"DOMAIN_NAME\""));
        assert!(files.tfvars.ends_with(b"\n"));
    }
}
