//! Subcommands and their execution.

use anyhow::{Context, Result};
use clap::Subcommand;
use parley_application::{
    AuthenticatedHttpClient, GetProfile, HttpClient, Login, Logout, Register, TokenStore,
    UpdateProfile,
};
use parley_domain::{LoginRequest, ProfileUpdate, RegisterRequest, ResponseSpec};
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the issued tokens
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PARLEY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, env = "PARLEY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the signed-in profile, or update it when any field is given
    Me {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        homepage: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// GET an API path
    Get { path: String },
    /// DELETE an API path
    Delete { path: String },
    /// POST a JSON body to an API path
    Post {
        path: String,
        /// JSON body, `{}` when omitted
        #[arg(short, long)]
        data: Option<String>,
    },
    /// PUT a JSON body to an API path
    Put {
        path: String,
        /// JSON body, `{}` when omitted
        #[arg(short, long)]
        data: Option<String>,
    },
}

impl Command {
    /// Runs the command and returns what should be printed.
    pub async fn run<C: HttpClient, S: TokenStore>(
        self,
        client: AuthenticatedHttpClient<C, S>,
    ) -> Result<String> {
        match self {
            Self::Login { username, password } => {
                let pair = Login::new(client)
                    .execute(&LoginRequest::new(username.as_str(), password))
                    .await
                    .context("login failed")?;
                let note = if pair.can_refresh() {
                    ""
                } else {
                    " (no refresh token issued)"
                };
                Ok(format!("logged in as {username}{note}"))
            }
            Self::Register {
                username,
                email,
                password,
            } => {
                let response = Register::new(client)
                    .execute(&RegisterRequest::new(username, email, password))
                    .await
                    .context("registration failed")?;
                Ok(render(&response))
            }
            Self::Logout => {
                Logout::new(client).execute().await?;
                Ok("logged out".to_string())
            }
            Self::Me {
                display_name,
                homepage,
                bio,
            } => {
                let update = ProfileUpdate {
                    display_name,
                    homepage,
                    bio,
                };
                let profile = if update.is_empty() {
                    GetProfile::new(client).execute().await?
                } else {
                    UpdateProfile::new(client).execute(&update).await?
                };
                Ok(serde_json::to_string_pretty(&profile)?)
            }
            Self::Get { path } => Ok(render(&client.get(&path).await?)),
            Self::Delete { path } => Ok(render(&client.delete(&path).await?)),
            Self::Post { path, data } => {
                let body = parse_body(data.as_deref())?;
                Ok(render(&client.post_json(&path, &body).await?))
            }
            Self::Put { path, data } => {
                let body = parse_body(data.as_deref())?;
                Ok(render(&client.put_json(&path, &body).await?))
            }
        }
    }
}

fn parse_body(data: Option<&str>) -> Result<Value> {
    data.map_or_else(
        || Ok(Value::Object(serde_json::Map::new())),
        |raw| serde_json::from_str(raw).context("--data is not valid JSON"),
    )
}

/// Pretty-prints JSON bodies, passes anything else through as text.
fn render(response: &ResponseSpec) -> String {
    response
        .json::<Value>()
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| response.text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use parley_application::{HttpClientError, InMemoryTokenStore};
    use parley_domain::{ClientSettings, RequestSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    /// Echoes the request body back with status 200.
    struct Echo;

    impl HttpClient for Echo {
        async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
            Ok(ResponseSpec::json_body(
                200,
                &json!({"url": request.url, "body": request.body}),
            ))
        }
    }

    fn client(store: InMemoryTokenStore) -> AuthenticatedHttpClient<Echo, InMemoryTokenStore> {
        AuthenticatedHttpClient::new(
            Arc::new(Echo),
            Arc::new(store),
            ClientSettings::with_base_url("http://api.test/api/v1"),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(None).unwrap(), json!({}));
        assert_eq!(
            parse_body(Some(r#"{"title": "hi"}"#)).unwrap(),
            json!({"title": "hi"})
        );
        assert!(parse_body(Some("{title")).is_err());
    }

    #[test]
    fn test_render_non_json_as_text() {
        let response = ResponseSpec {
            status: 200,
            body: b"plain".to_vec(),
            ..Default::default()
        };
        assert_eq!(render(&response), "plain");
    }

    #[tokio::test]
    async fn test_post_sends_data_to_joined_path() {
        let output = Command::Post {
            path: "/topics/".to_string(),
            data: Some(r#"{"title": "hi"}"#.to_string()),
        }
        .run(client(InMemoryTokenStore::new()))
        .await
        .unwrap();

        let echoed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(echoed["url"], "http://api.test/api/v1/topics/");
        assert_eq!(echoed["body"], json!({"title": "hi"}));
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let store = InMemoryTokenStore::with_tokens(Some("A1"), Some("R1"));

        let output = Command::Logout.run(client(store.clone())).await.unwrap();

        assert_eq!(output, "logged out");
        assert_eq!(store.count().await, 0);
    }
}
