//! # Constants
//!
//! Shared constants used throughout the engine.
//!
//! Terraform output names form the contract between the variables handed to
//! the provisioning run and the status read back from it. Changing one of them
//! breaks status reconstruction for existing state.

/// Terraform output key for the SSH key pair name
pub const TERRAFORM_OUTPUT_KEY_SSH_KEY_NAME: &str = "key_name";

/// Terraform output key for the router between the provider network and the worker subnet
pub const TERRAFORM_OUTPUT_KEY_ROUTER_ID: &str = "router_id";

/// Terraform output key for the router's external IP address
pub const TERRAFORM_OUTPUT_KEY_ROUTER_IP: &str = "router_ip";

/// Terraform output key for the private worker network
pub const TERRAFORM_OUTPUT_KEY_NETWORK_ID: &str = "network_id";

/// Terraform output key for the private worker network name
pub const TERRAFORM_OUTPUT_KEY_NETWORK_NAME: &str = "network_name";

/// Terraform output key for the worker security group
pub const TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_ID: &str = "security_group_id";

/// Terraform output key for the worker security group name
pub const TERRAFORM_OUTPUT_KEY_SECURITY_GROUP_NAME: &str = "security_group_name";

/// Terraform output key for the provider (floating) network
pub const TERRAFORM_OUTPUT_KEY_FLOATING_NETWORK_ID: &str = "floating_network_id";

/// Terraform output key for the worker subnet
pub const TERRAFORM_OUTPUT_KEY_SUBNET_ID: &str = "subnet_id";

/// Terraform output key for the share network (only when share networks are enabled)
pub const TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_ID: &str = "share_network_id";

/// Terraform output key for the share network name (only when share networks are enabled)
pub const TERRAFORM_OUTPUT_KEY_SHARE_NETWORK_NAME: &str = "share_network_name";

/// Router reference used when Terraform creates the router itself
pub const DEFAULT_ROUTER_ID: &str = "openstack_networking_router_v2.router.id";

/// Maximum retries for failed OpenStack API calls made by the Terraform provider
pub const DEFAULT_MAX_API_CALL_RETRIES: u32 = 10;

/// Purpose marker for subnets and security groups used by worker nodes
pub const PURPOSE_NODES: &str = "nodes";

/// Load balancer class purpose (and legacy name) selecting the default class
pub const DEFAULT_LOAD_BALANCER_CLASS: &str = "default";

/// Load balancer class purpose (and legacy name) selecting the private class
pub const PRIVATE_LOAD_BALANCER_CLASS: &str = "private";

/// API version of the provider-specific status and config objects
pub const PROVIDER_API_VERSION: &str = "openstack.provider.extensions.gardener.cloud/v1alpha1";

/// Kind of the persisted infrastructure status
pub const INFRASTRUCTURE_STATUS_KIND: &str = "InfrastructureStatus";

/// Name of the secret holding the cloud provider credentials
pub const SECRET_NAME_CLOUD_PROVIDER: &str = "cloudprovider";

/// Name of the secret holding the rendered cloud provider config
pub const CLOUD_PROVIDER_CONFIG_NAME: &str = "cloud-provider-config";

/// Data key of the rendered config inside the cloud provider config secrets
pub const CLOUD_PROVIDER_CONFIG_DATA_KEY: &str = "cloudprovider.conf";

/// Name of the secret holding the cloud provider config for the CSI driver
pub const CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME: &str = "cloud-provider-disk-config-csi";

/// Chart name of the cloud controller manager
pub const CLOUD_CONTROLLER_MANAGER_NAME: &str = "cloud-controller-manager";

/// Server certificate secret of the cloud controller manager
pub const CLOUD_CONTROLLER_MANAGER_SERVER_NAME: &str = "cloud-controller-manager-server";

/// Chart name of the Cinder CSI controller
pub const CSI_CONTROLLER_NAME: &str = "csi-driver-controller";

/// Chart name of the Cinder CSI node plugin
pub const CSI_NODE_NAME: &str = "csi-driver-node";

/// Chart name of the Manila CSI driver
pub const CSI_DRIVER_MANILA: &str = "csi-driver-manila";

/// Chart name of the NFS CSI driver used by Manila shares
pub const CSI_DRIVER_NFS: &str = "csi-driver-nfs";

/// Server certificate secret of the snapshot validation webhook
pub const CSI_SNAPSHOT_VALIDATION_SERVER_NAME: &str = "csi-snapshot-validation-server";

/// Service name of the snapshot validation webhook
pub const CSI_SNAPSHOT_VALIDATION_NAME: &str = "csi-snapshot-validation";

/// Provisioner of the Cinder CSI storage classes
pub const CSI_STORAGE_PROVISIONER: &str = "cinder.csi.openstack.org";

/// Volume binding mode of storage classes that do not set one
pub const DEFAULT_VOLUME_BINDING_MODE: &str = "WaitForFirstConsumer";

/// Storage class marked as cluster default when the cloud profile defines none
pub const DEFAULT_STORAGE_CLASS_NAME: &str = "default";

/// Second storage class created when the cloud profile defines none
pub const DEFAULT_CLASS_STORAGE_CLASS_NAME: &str = "default-class";

/// Admission plugin whose explicit disablement turns off PSP resources
pub const POD_SECURITY_POLICY_PLUGIN: &str = "PodSecurityPolicy";

/// Annotation prefix for secret checksums on pod templates
pub const CHECKSUM_ANNOTATION_PREFIX: &str = "checksum/secret-";

/// Label allowing maintenance restarts of control plane pods
pub const LABEL_MAINTENANCE_RESTART: &str = "maintenance.gardener.cloud/restart";

/// TLS cipher suites accepted by the cloud controller manager
pub const CLOUD_CONTROLLER_MANAGER_TLS_CIPHER_SUITES: &[&str] = &[
    "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
    "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
    "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305",
    "TLS_RSA_WITH_AES_128_CBC_SHA",
    "TLS_RSA_WITH_AES_256_CBC_SHA",
    "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA",
];

/// Default Terraform binary invoked by the output reader
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Default namespace used when reading secrets from the cluster
pub const DEFAULT_NAMESPACE: &str = "default";
