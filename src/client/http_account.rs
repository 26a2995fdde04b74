use crate::domain::{Account, AccountHandle, Amount, Fault};
use reqwest::{Client, Response};

/// HTTP-backed implementation of [`AccountHandle`]: the client-side proxy for
/// an account service reached over the network.
#[derive(Debug, Clone)]
pub struct HttpAccount {
    http: Client,
    base_url: String,
}

impl HttpAccount {
    /// Resolve `base_url` into a callable handle by probing the service's
    /// readiness route. Fails with [`Fault::ServiceUnavailable`] before any
    /// operation is attempted if the service cannot be reached.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self, Fault> {
        let base_url = base_url.into();
        let http = Client::new();

        let response = http
            .get(&base_url)
            .send()
            .await
            .map_err(|error| Fault::ServiceUnavailable(error.to_string()))?;
        if !response.status().is_success() {
            return Err(Fault::ServiceUnavailable(format!(
                "readiness probe returned {}",
                response.status()
            )));
        }

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v0{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, url: String, amount: Amount) -> Result<(), Fault> {
        let response = self
            .http
            .post(url)
            .json(&amount)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fault_from(response).await);
        }
        Ok(())
    }
}

impl AccountHandle for HttpAccount {
    async fn balance(&self) -> Result<u64, Fault> {
        let response = self
            .http
            .get(self.url("/account"))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fault_from(response).await);
        }
        let account = response.json::<Account>().await.map_err(transport)?;
        Ok(account.balance)
    }

    async fn deposit(&self, amount: i64) -> Result<(), Fault> {
        self.post(self.url("/account/deposit"), Amount { amount })
            .await
    }

    async fn withdraw(&self, amount: i64) -> Result<(), Fault> {
        self.post(self.url("/account/withdraw"), Amount { amount })
            .await
    }

    async fn shutdown(&self) -> Result<(), Fault> {
        let response = self
            .http
            .post(self.url("/shutdown"))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fault_from(response).await);
        }
        Ok(())
    }
}

fn transport(error: reqwest::Error) -> Fault {
    Fault::TransportFailure(error.to_string())
}

/// Decode the fault the service reported. A fault body that cannot be decoded
/// is a transport failure, never a made-up result.
async fn fault_from(response: Response) -> Fault {
    let status = response.status();
    match response.json::<Fault>().await {
        Ok(fault) => fault,
        Err(error) => Fault::TransportFailure(format!(
            "malformed fault body for status {status}: {error}"
        )),
    }
}
