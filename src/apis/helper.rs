//! # Lookup Helpers
//!
//! Region-aware lookups over the cloud profile and the infrastructure status.

use super::{CloudProfileConfig, FloatingPool, InfrastructureStatus, Subnet};
use crate::error::{Error, Result};
use regex::Regex;

/// Find the floating pool matching `pool_name` for `region` and `domain`
///
/// Pool names in the cloud profile may be `*` patterns. Entries bound to a
/// domain are only offered to that domain, so without a `domain` they never
/// match. Among the candidates, region-bound entries win over region-less ones,
/// then domain-bound entries win over domain-less ones. Returns `None` when
/// nothing matches.
#[must_use]
pub fn find_floating_pool<'a>(
    pools: &'a [FloatingPool],
    pool_name: &str,
    region: &str,
    domain: Option<&str>,
) -> Option<&'a FloatingPool> {
    pools
        .iter()
        .filter(|pool| name_matches(&pool.name, pool_name))
        .filter(|pool| match pool.region.as_deref() {
            Some(pool_region) => pool_region == region,
            None => true,
        })
        .filter(|pool| match pool.domain.as_deref() {
            Some(pool_domain) => domain == Some(pool_domain),
            None => true,
        })
        .min_by_key(|pool| (pool.region.is_none(), pool.domain.is_none()))
}

/// Keystone URL for `region`
///
/// The global URL wins, then the first region-specific entry.
pub fn find_keystone_url(cloud_profile: &CloudProfileConfig, region: &str) -> Result<String> {
    if !cloud_profile.keystone_url.is_empty() {
        return Ok(cloud_profile.keystone_url.clone());
    }

    cloud_profile
        .keystone_urls
        .iter()
        .find(|entry| entry.region == region)
        .map(|entry| entry.url.clone())
        .ok_or_else(|| Error::constraint(region, "cannot find keystone URL"))
}

/// Keystone CA bundle for `region`
///
/// The CA of the region-specific entry wins. A region entry without a CA
/// falls back to the global bundle. Empty bundles count as absent.
#[must_use]
pub fn find_keystone_ca_cert<'a>(
    cloud_profile: &'a CloudProfileConfig,
    region: &str,
) -> Option<&'a str> {
    cloud_profile
        .keystone_urls
        .iter()
        .find(|entry| entry.region == region)
        .and_then(|entry| entry.ca_cert.as_deref())
        .filter(|ca| !ca.is_empty())
        .or_else(|| {
            cloud_profile
                .keystone_ca_cert
                .as_deref()
                .filter(|ca| !ca.is_empty())
        })
}

/// First subnet of the status carrying `purpose`
#[must_use]
pub fn find_subnet_by_purpose<'a>(
    status: &'a InfrastructureStatus,
    purpose: &str,
) -> Option<&'a Subnet> {
    status
        .networks
        .subnets
        .iter()
        .find(|subnet| subnet.purpose == purpose)
}

fn name_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == name;
    }
    let expr = format!("^{}$", regex::escape(pattern).replace(r"\*", ".*"));
    Regex::new(&expr).is_ok_and(|re| re.is_match(name))
}
