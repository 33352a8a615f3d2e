use serde::{Deserialize, Serialize};

use super::{Flavor, KubernetesClient};
use crate::{ApiRequest, MgcError, Result};

/// Flavors available for node pools and for the control plane.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorsAvailable {
    #[serde(default)]
    pub nodepool: Vec<Flavor>,
    #[serde(default)]
    pub controlplane: Vec<Flavor>,
}

pub struct FlavorService<'a> {
    client: &'a KubernetesClient,
}

impl<'a> FlavorService<'a> {
    pub(crate) fn new(client: &'a KubernetesClient) -> Self {
        Self { client }
    }

    /// Returns the first entry of the response; an empty result set is an error.
    pub async fn list(&self) -> Result<FlavorsAvailable> {
        let results: Vec<FlavorsAvailable> = self
            .client
            .send_results(ApiRequest::get("/v1/flavors"))
            .await?;
        first_result(results)
    }
}

fn first_result(results: Vec<FlavorsAvailable>) -> Result<FlavorsAvailable> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| MgcError::Decode("no flavors available".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::{first_result, FlavorsAvailable};
    use crate::MgcError;

    #[test]
    fn empty_results_are_an_error() {
        let err = first_result(Vec::new()).expect_err("empty results must fail");
        assert!(matches!(err, MgcError::Decode(message) if message == "no flavors available"));
    }

    #[test]
    fn first_result_wins() {
        let results: Vec<FlavorsAvailable> = serde_json::from_value(serde_json::json!([
            {
                "nodepool": [{"name": "cloud-k8s.gp1.small", "id": "f-1", "vcpu": 2, "ram": 4096, "size": 20}],
                "controlplane": []
            },
            {"nodepool": [], "controlplane": []}
        ]))
        .expect("flavors must decode");

        let flavors = first_result(results).expect("first result must be returned");
        assert_eq!(flavors.nodepool[0].vcpu, 2);
        assert!(flavors.controlplane.is_empty());
    }
}
