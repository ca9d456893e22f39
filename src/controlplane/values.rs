//! # Chart Values
//!
//! Composes the value trees for the cloud provider config chart, the
//! control plane chart (seed side), the shoot chart and the storage classes
//! chart.
//!
//! Every function builds a fresh tree from its inputs. Keys listed in the
//! always-present sets are emitted even when their source is unset (as `null`),
//! conditional keys are left out entirely.

use super::checksums::checksum_annotations;
use super::cluster::ClusterConstraints;
use super::load_balancer::ResolvedLoadBalancerClasses;
use crate::apis::helper::{find_keystone_ca_cert, find_keystone_url, find_subnet_by_purpose};
use crate::apis::{
    CloudProfileConfig, ControlPlaneConfig, InfrastructureStatus, LoadBalancerClass,
    StorageClassDefinition,
};
use crate::constants::{
    CLOUD_CONTROLLER_MANAGER_NAME, CLOUD_CONTROLLER_MANAGER_SERVER_NAME,
    CLOUD_CONTROLLER_MANAGER_TLS_CIPHER_SUITES, CLOUD_PROVIDER_CONFIG_NAME,
    CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME, CSI_CONTROLLER_NAME, CSI_DRIVER_MANILA, CSI_DRIVER_NFS,
    CSI_NODE_NAME, CSI_SNAPSHOT_VALIDATION_NAME, CSI_SNAPSHOT_VALIDATION_SERVER_NAME,
    CSI_STORAGE_PROVISIONER, DEFAULT_CLASS_STORAGE_CLASS_NAME, DEFAULT_STORAGE_CLASS_NAME,
    DEFAULT_VOLUME_BINDING_MODE, LABEL_MAINTENANCE_RESTART, PURPOSE_NODES, SECRET_NAME_CLOUD_PROVIDER,
    TERRAFORM_OUTPUT_KEY_SUBNET_ID,
};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Everything describing one control plane, minus secret material
#[derive(Debug, Clone, Copy)]
pub struct ControlPlaneInputs<'a> {
    /// Control plane namespace, doubles as the cluster name
    pub namespace: &'a str,
    pub region: &'a str,
    pub config: &'a ControlPlaneConfig,
    pub status: &'a InfrastructureStatus,
    pub cloud_profile: &'a CloudProfileConfig,
    pub cluster: &'a ClusterConstraints,
}

/// Values for the cloud provider config chart
///
/// # Errors
///
/// Fails when the keystone URL cannot be resolved for the region, or when the
/// status has no worker subnet and no load balancer class sets one.
pub fn config_chart_values(
    inputs: &ControlPlaneInputs<'_>,
    credentials: &Credentials,
    classes: &ResolvedLoadBalancerClasses,
) -> Result<Value> {
    let profile = inputs.cloud_profile;
    let top_level = &classes.top_level;

    let subnet_id = match &top_level.subnet_id {
        Some(subnet_id) => subnet_id.clone(),
        None => find_subnet_by_purpose(inputs.status, PURPOSE_NODES)
            .map(|subnet| subnet.id.clone())
            .ok_or_else(|| Error::MissingOutput {
                keys: vec![TERRAFORM_OUTPUT_KEY_SUBNET_ID.to_string()],
            })?,
    };
    let auth_url = find_keystone_url(profile, inputs.region)?;

    let mut values = object(json!({
        "domainName": credentials.domain_name,
        "tenantName": credentials.tenant_name,
        "username": credentials.username,
        "password": credentials.password,
        "applicationCredentialID": credentials.application_credential_id,
        "applicationCredentialName": credentials.application_credential_name,
        "applicationCredentialSecret": credentials.application_credential_secret,
        "region": inputs.region,
        "insecure": profile.keystone_force_insecure || credentials.insecure,
        "lbProvider": inputs.config.load_balancer_provider,
        "floatingNetworkID": top_level.floating_network_id,
        "subnetID": subnet_id,
        "authUrl": auth_url,
        "dhcpDomain": profile.dhcp_domain,
        "requestTimeout": profile.request_timeout,
        "useOctavia": profile.use_octavia,
        "rescanBlockStorageOnResize": profile.rescan_block_storage_on_resize,
        "ignoreVolumeAZ": profile.ignore_volume_az,
        "nodeVolumeAttachLimit": profile.node_volume_attach_limit,
        "internalNetworkName": inputs.status.networks.name,
    }));

    insert_set(&mut values, "floatingSubnetID", &top_level.floating_subnet_id);
    insert_set(&mut values, "floatingSubnetName", &top_level.floating_subnet_name);
    insert_set(&mut values, "floatingSubnetTags", &top_level.floating_subnet_tags);

    let declared = classes.declared();
    if !declared.is_empty() {
        debug!("Emitting {} floating classes", declared.len());
        values.insert(
            "floatingClasses".to_string(),
            Value::Array(declared.iter().map(floating_class).collect()),
        );
    }

    if !inputs.cluster.overlay_enabled {
        debug!("Cluster runs without overlay, enabling cloud routes");
        values.insert(
            "routerID".to_string(),
            json!(inputs.status.networks.router.id),
        );
    }

    let ca_cert = credentials
        .ca_cert
        .as_deref()
        .or_else(|| find_keystone_ca_cert(profile, inputs.region))
        .filter(|ca| !ca.is_empty());
    if let Some(ca_cert) = ca_cert {
        values.insert("caCert".to_string(), json!(ca_cert));
    }

    Ok(Value::Object(values))
}

/// Values for the control plane chart
///
/// # Errors
///
/// Returns [`Error::MissingChecksum`] when a secret mounted by a component has
/// no checksum.
pub fn control_plane_chart_values(
    inputs: &ControlPlaneInputs<'_>,
    credentials: &Credentials,
    checksums: &BTreeMap<String, String>,
) -> Result<Value> {
    let cluster = inputs.cluster;
    let replicas = cluster.control_plane_replicas();
    let user_agent_headers = user_agent_headers(credentials, cluster);

    let ccm_annotations = checksum_annotations(
        &[SECRET_NAME_CLOUD_PROVIDER, CLOUD_PROVIDER_CONFIG_NAME],
        checksums,
    )?;
    let csi_annotations = checksum_annotations(&[CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME], checksums)?;

    let mut csi = object(json!({
        "enabled": true,
        "replicas": replicas,
        "podAnnotations": csi_annotations,
        "userAgentHeaders": user_agent_headers,
        "csiSnapshotController": {
            "replicas": replicas,
        },
    }));
    if cluster.csi_snapshot_validation_enabled {
        csi.insert(
            "csiSnapshotValidationWebhook".to_string(),
            json!({
                "replicas": replicas,
                "secrets": {
                    "server": CSI_SNAPSHOT_VALIDATION_SERVER_NAME,
                },
            }),
        );
    }

    Ok(json!({
        "global": {
            "genericTokenKubeconfigSecretName": cluster.generic_token_kubeconfig_secret_name,
        },
        CLOUD_CONTROLLER_MANAGER_NAME: {
            "enabled": true,
            "replicas": replicas,
            "kubernetesVersion": cluster.kubernetes_version,
            "clusterName": inputs.namespace,
            "podNetwork": cluster.pod_cidr,
            "podAnnotations": ccm_annotations,
            "podLabels": {
                LABEL_MAINTENANCE_RESTART: "true",
            },
            "featureGates": inputs.config.ccm_feature_gates(),
            "tlsCipherSuites": CLOUD_CONTROLLER_MANAGER_TLS_CIPHER_SUITES,
            "secrets": {
                "server": CLOUD_CONTROLLER_MANAGER_SERVER_NAME,
            },
            "userAgentHeaders": user_agent_headers,
        },
        CSI_CONTROLLER_NAME: Value::Object(csi),
    }))
}

/// Values for the shoot chart
///
/// `csi_disk_config` is the rendered cloud provider config of the CSI driver,
/// `webhook_ca_bundle` the CA of the snapshot validation webhook.
///
/// # Errors
///
/// Returns [`Error::MissingChecksum`] when the CSI disk config has no checksum.
pub fn shoot_chart_values(
    inputs: &ControlPlaneInputs<'_>,
    credentials: &Credentials,
    checksums: &BTreeMap<String, String>,
    csi_disk_config: &[u8],
    webhook_ca_bundle: &str,
) -> Result<Value> {
    let cluster = inputs.cluster;
    let psp_disabled = cluster.psp_disabled();
    let csi_annotations = checksum_annotations(&[CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME], checksums)?;

    let share_network = inputs
        .status
        .networks
        .share_network
        .as_ref()
        .filter(|_| inputs.config.manila_enabled());

    let (manila, nfs) = match share_network {
        Some(share_network) => {
            debug!("Manila enabled with share network {}", share_network.id);
            let tls_insecure = if credentials.insecure { "true" } else { "" };
            (
                json!({
                    "enabled": true,
                    "csimanila": {
                        "clusterID": inputs.namespace,
                    },
                    "openstack": {
                        "authURL": credentials.auth_url,
                        "region": inputs.region,
                        "domainName": credentials.domain_name,
                        "projectName": credentials.tenant_name,
                        "userName": credentials.username,
                        "password": credentials.password,
                        "applicationCredentialID": credentials.application_credential_id,
                        "applicationCredentialName": credentials.application_credential_name,
                        "applicationCredentialSecret": credentials.application_credential_secret,
                        "availabilityZones": cluster.sorted_zones(),
                        "shareClient": cluster.workers_cidr,
                        "shareNetworkID": share_network.id,
                        "tlsInsecure": tls_insecure,
                        "caCert": credentials.ca_cert.as_deref().unwrap_or_default(),
                    },
                    "pspDisabled": psp_disabled,
                    "vpaEnabled": cluster.vpa_enabled,
                }),
                json!({
                    "enabled": true,
                    "pspDisabled": psp_disabled,
                    "vpaEnabled": cluster.vpa_enabled,
                }),
            )
        }
        None => (json!({ "enabled": false }), json!({ "enabled": false })),
    };

    Ok(json!({
        CLOUD_CONTROLLER_MANAGER_NAME: {
            "enabled": true,
        },
        CSI_NODE_NAME: {
            "enabled": true,
            "vpaEnabled": cluster.vpa_enabled,
            "podAnnotations": csi_annotations,
            "userAgentHeaders": user_agent_headers(credentials, cluster),
            "cloudProviderConfig": String::from_utf8_lossy(csi_disk_config),
            "webhookConfig": {
                "url": format!(
                    "https://{CSI_SNAPSHOT_VALIDATION_NAME}.{}/volumesnapshot",
                    inputs.namespace
                ),
                "caBundle": webhook_ca_bundle,
            },
            "pspDisabled": psp_disabled,
        },
        CSI_DRIVER_MANILA: manila,
        CSI_DRIVER_NFS: nfs,
    }))
}

/// Values for the storage classes chart
///
/// Without storage classes in the cloud profile, a default class named
/// `default` and a plain `default-class` are deployed.
#[must_use]
pub fn storage_classes_chart_values(cloud_profile: &CloudProfileConfig) -> Value {
    let storage_classes: Vec<Value> = if cloud_profile.storage_classes.is_empty() {
        debug!("Cloud profile defines no storage classes, using defaults");
        vec![
            json!({
                "name": DEFAULT_STORAGE_CLASS_NAME,
                "default": true,
                "provisioner": CSI_STORAGE_PROVISIONER,
                "volumeBindingMode": DEFAULT_VOLUME_BINDING_MODE,
            }),
            json!({
                "name": DEFAULT_CLASS_STORAGE_CLASS_NAME,
                "provisioner": CSI_STORAGE_PROVISIONER,
                "volumeBindingMode": DEFAULT_VOLUME_BINDING_MODE,
            }),
        ]
    } else {
        cloud_profile.storage_classes.iter().map(storage_class).collect()
    };

    json!({ "storageclasses": storage_classes })
}

/// Headers identifying the cluster in OpenStack API logs
fn user_agent_headers(credentials: &Credentials, cluster: &ClusterConstraints) -> Vec<String> {
    [
        credentials.domain_name.as_str(),
        credentials.tenant_name.as_str(),
        cluster.technical_id.as_str(),
    ]
    .into_iter()
    .filter(|header| !header.is_empty())
    .map(str::to_string)
    .collect()
}

fn floating_class(class: &LoadBalancerClass) -> Value {
    let mut entry = Map::new();
    entry.insert("name".to_string(), json!(class.name));
    insert_set(&mut entry, "floatingNetworkID", &class.floating_network_id);
    insert_set(&mut entry, "floatingSubnetID", &class.floating_subnet_id);
    insert_set(&mut entry, "floatingSubnetName", &class.floating_subnet_name);
    insert_set(&mut entry, "floatingSubnetTags", &class.floating_subnet_tags);
    insert_set(&mut entry, "subnetID", &class.subnet_id);
    Value::Object(entry)
}

fn storage_class(definition: &StorageClassDefinition) -> Value {
    let mut entry = Map::new();
    entry.insert("name".to_string(), json!(definition.name));
    if definition.default == Some(true) {
        entry.insert("default".to_string(), json!(true));
    }
    for (key, map) in [
        ("annotations", &definition.annotations),
        ("labels", &definition.labels),
        ("parameters", &definition.parameters),
    ] {
        if !map.is_empty() {
            entry.insert(key.to_string(), json!(map));
        }
    }

    let provisioner = definition
        .provisioner
        .as_deref()
        .filter(|provisioner| !provisioner.is_empty())
        .unwrap_or(CSI_STORAGE_PROVISIONER);
    entry.insert("provisioner".to_string(), json!(provisioner));
    insert_set(&mut entry, "reclaimPolicy", &definition.reclaim_policy);

    let binding_mode = definition
        .volume_binding_mode
        .as_deref()
        .filter(|mode| !mode.is_empty())
        .unwrap_or(DEFAULT_VOLUME_BINDING_MODE);
    entry.insert("volumeBindingMode".to_string(), json!(binding_mode));

    Value::Object(entry)
}

fn insert_set(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
