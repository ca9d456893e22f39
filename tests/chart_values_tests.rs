//! # Chart Values Tests
//!
//! Chart values composed through the values provider with an in-memory
//! secret store.

mod common;

use common::{secret, secret_ref};
use openstack_provisioning_values::apis::{
    CloudProfileConfig, ControlPlaneConfig, FloatingPool, InfrastructureStatus, LoadBalancerClass,
    Subnet,
};
use openstack_provisioning_values::collaborators::ManifestSecretReader;
use openstack_provisioning_values::controlplane::{
    AdmissionPlugin, ClusterConstraints, ControlPlaneInputs, ValuesProvider,
};
use openstack_provisioning_values::Error;
use serde_json::json;
use std::collections::BTreeMap;

const CSI_DISK_CONFIG_CHECKSUM: &str =
    "77627eb2343b9f2dc2fca3cce35f2f9eec55783aa5f7dac21c473019e5825de2";

struct Scenario {
    config: ControlPlaneConfig,
    status: InfrastructureStatus,
    cloud_profile: CloudProfileConfig,
    cluster: ClusterConstraints,
}

impl Scenario {
    fn new() -> Self {
        let mut status = InfrastructureStatus::default();
        status.networks.name = "shoot--dev--test".to_string();
        status.networks.floating_pool.id = "floating-network-id".to_string();
        status.networks.floating_pool.name = "fip".to_string();
        status.networks.router.id = "routerID".to_string();
        status.networks.subnets = vec![Subnet {
            purpose: "nodes".to_string(),
            id: "subnet-acbd1234".to_string(),
        }];

        Self {
            config: ControlPlaneConfig {
                load_balancer_provider: "load-balancer-provider".to_string(),
                ..Default::default()
            },
            status,
            cloud_profile: CloudProfileConfig {
                keystone_url: "someurl".to_string(),
                ..Default::default()
            },
            cluster: ClusterConstraints {
                technical_id: "shoot--dev--test".to_string(),
                kubernetes_version: "1.27.3".to_string(),
                pod_cidr: "10.250.0.0/19".to_string(),
                workers_cidr: "10.200.0.0/19".to_string(),
                vpa_enabled: true,
                ..Default::default()
            },
        }
    }

    fn inputs(&self) -> ControlPlaneInputs<'_> {
        ControlPlaneInputs {
            namespace: "test",
            region: "europe",
            config: &self.config,
            status: &self.status,
            cloud_profile: &self.cloud_profile,
            cluster: &self.cluster,
        }
    }
}

fn reader(credentials: &[(&str, &str)]) -> ManifestSecretReader {
    let mut reader = ManifestSecretReader::default();
    reader.insert(secret_ref("cloudprovider"), secret(credentials));
    reader.insert(
        secret_ref("cloud-provider-disk-config-csi"),
        secret(&[("cloudprovider.conf", "foo")]),
    );
    reader
}

fn password_reader() -> ManifestSecretReader {
    reader(&[
        ("domainName", "domain-name"),
        ("tenantName", "tenant-name"),
        ("username", "username"),
        ("password", "password"),
        ("authURL", "someurl"),
    ])
}

fn checksums() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("cloudprovider".to_string(), "8bafb35f".to_string()),
        ("cloud-provider-config".to_string(), "bf19236c".to_string()),
        (
            "cloud-provider-disk-config-csi".to_string(),
            CSI_DISK_CONFIG_CHECKSUM.to_string(),
        ),
    ])
}

#[tokio::test]
async fn test_application_credentials_replace_password() {
    let scenario = Scenario::new();
    let provider = ValuesProvider::new(reader(&[
        ("domainName", "domain-name"),
        ("tenantName", "tenant-name"),
        ("username", "ignored"),
        ("password", "ignored"),
        ("applicationCredentialID", "app-id"),
        ("applicationCredentialSecret", "app-secret"),
    ]));

    let values = provider
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");
    assert_eq!(values["username"], "");
    assert_eq!(values["password"], "");
    assert_eq!(values["applicationCredentialID"], "app-id");
    assert_eq!(values["applicationCredentialSecret"], "app-secret");
}

#[tokio::test]
async fn test_missing_credentials_fail() {
    let scenario = Scenario::new();
    let provider = ValuesProvider::new(reader(&[("domainName", "domain-name")]));
    let result = provider.get_config_chart_values(&scenario.inputs()).await;
    assert!(matches!(result, Err(Error::MissingCredential { .. })));
}

#[tokio::test]
async fn test_default_purpose_beats_default_name() {
    let mut scenario = Scenario::new();
    scenario.status.networks.floating_pool.id = "fip1".to_string();
    scenario.config.load_balancer_classes = Some(vec![
        LoadBalancerClass {
            name: "default".to_string(),
            floating_subnet_id: Some("fip-subnet-1".to_string()),
            ..Default::default()
        },
        LoadBalancerClass {
            name: "real-default".to_string(),
            floating_subnet_id: Some("fip-subnet-2".to_string()),
            purpose: Some("default".to_string()),
            ..Default::default()
        },
    ]);

    let values = ValuesProvider::new(password_reader())
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");

    assert_eq!(values["floatingNetworkID"], "fip1");
    assert_eq!(values["floatingSubnetID"], "fip-subnet-2");
    assert_eq!(
        values["floatingClasses"],
        json!([
            {"name": "default", "floatingSubnetID": "fip-subnet-1"},
            {"name": "real-default", "floatingSubnetID": "fip-subnet-2"},
        ])
    );
}

#[tokio::test]
async fn test_empty_class_list_uses_legacy_network() {
    let scenario = Scenario::new();
    let values = ValuesProvider::new(password_reader())
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");

    assert_eq!(values["floatingNetworkID"], "floating-network-id");
    assert!(values.get("floatingClasses").is_none());
    assert!(values.get("floatingSubnetID").is_none());
}

#[tokio::test]
async fn test_cloud_profile_classes_apply_without_declared_classes() {
    let mut scenario = Scenario::new();
    scenario.cloud_profile.constraints.floating_pools = vec![FloatingPool {
        name: "fip".to_string(),
        load_balancer_classes: vec![LoadBalancerClass {
            name: "internet".to_string(),
            floating_subnet_name: Some("*public*".to_string()),
            purpose: Some("default".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }];

    let values = ValuesProvider::new(password_reader())
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");
    assert_eq!(values["floatingSubnetName"], "*public*");
    assert_eq!(
        values["floatingClasses"],
        json!([{"name": "internet", "floatingSubnetName": "*public*"}])
    );
}

#[tokio::test]
async fn test_domain_bound_pool_classes_need_matching_domain() {
    let mut scenario = Scenario::new();
    scenario.cloud_profile.constraints.floating_pools = vec![FloatingPool {
        name: "fip".to_string(),
        domain: Some("other-domain".to_string()),
        load_balancer_classes: vec![LoadBalancerClass {
            name: "internet".to_string(),
            floating_subnet_name: Some("*public*".to_string()),
            purpose: Some("default".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }];

    let values = ValuesProvider::new(password_reader())
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");
    assert!(values.get("floatingClasses").is_none());
    assert!(values.get("floatingSubnetName").is_none());

    scenario.cloud_profile.constraints.floating_pools[0].domain = Some("domain-name".to_string());
    let values = ValuesProvider::new(password_reader())
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");
    assert_eq!(values["floatingSubnetName"], "*public*");
}

#[test]
fn test_storage_classes_use_cinder_provisioner() {
    let scenario = Scenario::new();
    let values =
        ValuesProvider::new(password_reader()).get_storage_classes_chart_values(&scenario.inputs());

    let storage_classes = values["storageclasses"].as_array().expect("list");
    assert_eq!(storage_classes.len(), 2);
    for storage_class in storage_classes {
        assert_eq!(storage_class["provisioner"], "cinder.csi.openstack.org");
    }
    assert_eq!(storage_classes[0]["default"], true);
}

#[tokio::test]
async fn test_checksums_propagate_exactly() {
    let scenario = Scenario::new();
    let values = ValuesProvider::new(password_reader())
        .get_control_plane_chart_values(&scenario.inputs(), &checksums())
        .await
        .expect("values");

    assert_eq!(
        values["cloud-controller-manager"]["podAnnotations"],
        json!({
            "checksum/secret-cloudprovider": "8bafb35f",
            "checksum/secret-cloud-provider-config": "bf19236c",
        })
    );
    assert_eq!(
        values["csi-driver-controller"]["podAnnotations"],
        json!({"checksum/secret-cloud-provider-disk-config-csi": CSI_DISK_CONFIG_CHECKSUM})
    );
}

#[tokio::test]
async fn test_missing_checksum_is_reported() {
    let scenario = Scenario::new();
    let mut checksums = checksums();
    checksums.remove("cloudprovider");

    let result = ValuesProvider::new(password_reader())
        .get_control_plane_chart_values(&scenario.inputs(), &checksums)
        .await;
    assert!(matches!(result, Err(Error::MissingChecksum { secret }) if secret == "cloudprovider"));
}

#[tokio::test]
async fn test_shoot_values_compute_disk_config_checksum() {
    let scenario = Scenario::new();
    let values = ValuesProvider::new(password_reader())
        .get_shoot_chart_values(&scenario.inputs(), &BTreeMap::new(), "")
        .await
        .expect("values");

    assert_eq!(
        values["csi-driver-node"],
        json!({
            "enabled": true,
            "vpaEnabled": true,
            "podAnnotations": {
                "checksum/secret-cloud-provider-disk-config-csi": CSI_DISK_CONFIG_CHECKSUM,
            },
            "userAgentHeaders": ["domain-name", "tenant-name", "shoot--dev--test"],
            "cloudProviderConfig": "foo",
            "webhookConfig": {
                "url": "https://csi-snapshot-validation.test/volumesnapshot",
                "caBundle": "",
            },
            "pspDisabled": false,
        })
    );
    assert_eq!(values["csi-driver-manila"], json!({"enabled": false}));
    assert_eq!(values["csi-driver-nfs"], json!({"enabled": false}));
}

#[tokio::test]
async fn test_psp_gate_requires_explicit_disable() {
    for (disabled, expected) in [(None, false), (Some(false), false), (Some(true), true)] {
        let mut scenario = Scenario::new();
        scenario.cluster.admission_plugins = vec![AdmissionPlugin {
            name: "PodSecurityPolicy".to_string(),
            disabled,
        }];

        let values = ValuesProvider::new(password_reader())
            .get_shoot_chart_values(&scenario.inputs(), &BTreeMap::new(), "")
            .await
            .expect("values");
        assert_eq!(values["csi-driver-node"]["pspDisabled"], expected);
    }
}

#[tokio::test]
async fn test_custom_secret_name() {
    let scenario = Scenario::new();
    let mut reader = password_reader();
    reader.insert(
        secret_ref("openstack-credentials"),
        secret(&[("username", "other-user"), ("password", "other-password")]),
    );

    let values = ValuesProvider::new(reader)
        .with_secret_name("openstack-credentials")
        .get_config_chart_values(&scenario.inputs())
        .await
        .expect("values");
    assert_eq!(values["username"], "other-user");
}
