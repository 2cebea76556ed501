//! What the caller sees: a redirect to the results page, or a plain text message
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::config::ResponseConfig;
use crate::dispatch::Dispatch;
use crate::layout::Token;
use crate::request::chain::ChainQuery;

/// Response body and its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Timed redirect to the results page
    Html(String),
    /// Rejection or fatal error, no results page exists
    Text(String),
}

impl Response {
    pub fn content_type(&self) -> &str {
        match self {
            Response::Html(_) => "text/html; charset=utf-8",
            Response::Text(_) => "text/plain; charset=utf-8",
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Response::Html(body) | Response::Text(body) => body,
        }
    }
}

/// Rendering context for the redirect page
#[derive(Serialize)]
struct RedirectContext {
    pdb_id: String,
    chain: String,
    token: String,
    message: String,
    delay: u32,
    url: String,
}

/// Results page address for a token
pub fn results_url(config: &ResponseConfig, token: Token) -> String {
    format!("{}/{}", config.results_url.trim_end_matches('/'), token)
}

/// Render the redirect page, issued once per request whatever the dispatch outcome
pub fn redirect(
    config: &ResponseConfig,
    query: &ChainQuery,
    token: Token,
    dispatch: &Dispatch,
) -> Result<Response, tinytemplate::error::Error> {
    /// included redirect template
    static REDIRECT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/redirect.html"));
    let mut tt = TinyTemplate::new();
    tt.add_template("redirect", REDIRECT)?;

    let message = match dispatch {
        Dispatch::Queued { .. } => {
            "We will now queue the Conserv job, please wait a few seconds to be directed to the running/results page."
        }
        Dispatch::ExtractionFailed => {
            "The chain could not be extracted, you will be directed to the results page for details."
        }
        Dispatch::SubmissionFailed { .. } => {
            "The job could not be queued, you will be directed to the results page for details."
        }
    };

    let context = RedirectContext {
        pdb_id: query.pdb_id().to_string(),
        chain: query.chain().to_string(),
        token: token.to_string(),
        message: message.to_string(),
        delay: config.redirect_delay_secs,
        url: results_url(config, token),
    };

    Ok(Response::Html(tt.render("redirect", &context)?))
}

/// Plain text message for a request that never reached a results page
pub fn text(message: impl ToString) -> Response {
    Response::Text(format!("{}\n", message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    fn config() -> ResponseConfig {
        ResponseConfig { results_url: "http://conserv.example.org/results/".to_string(), redirect_delay_secs: 5 }
    }

    #[test]
    fn redirect_targets_token_page() {
        let query = ChainQuery::new("1abc", "a").unwrap();
        let dispatch = Dispatch::Queued { ticket: "1.limlab".to_string() };

        let response = redirect(&config(), &query, Token(90210), &dispatch).unwrap();

        assert_eq!(response.content_type(), "text/html; charset=utf-8");
        let body = response.body();
        assert!(body.contains("You entered 1abc A, job 90210"));
        assert!(body.contains("We will now queue the Conserv job"));
        assert!(body.contains(r#"content="5; URL=http://conserv.example.org/results/90210""#));
    }

    #[test]
    fn failures_still_redirect() {
        let query = ChainQuery::new("1abc", "A").unwrap();
        for dispatch in [Dispatch::ExtractionFailed, Dispatch::SubmissionFailed { reason: "down".to_string() }] {
            let response = redirect(&config(), &query, Token(3), &dispatch).unwrap();
            assert!(response.body().contains("URL=http://conserv.example.org/results/3"));
        }
    }

    #[test]
    fn request_values_are_escaped() {
        let query = ChainQuery::new("<b>1", "&").unwrap();
        let response = redirect(&config(), &query, Token(3), &Dispatch::ExtractionFailed).unwrap();
        assert!(!response.body().contains("<b>"));
        assert!(response.body().contains("&lt;b&gt;1"));
    }

    #[test]
    fn rejection_is_plain_text() {
        let response = text(InputError::PdbIdLength(3));
        assert_eq!(response, Response::Text("Sorry but PDB IDs are 4 characters\n".to_string()));
        assert_eq!(response.content_type(), "text/plain; charset=utf-8");
    }
}
