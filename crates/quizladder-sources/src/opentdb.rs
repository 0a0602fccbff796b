//! Open Trivia DB source.
//!
//! Fetches `GET {base}/api.php?amount=N[&category=C]` and maps the results
//! onto tiered questions. The API's `difficulty` field is the tier.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use quizladder_core::model::{Question, QuestionBank, Tier};
use quizladder_core::traits::QuestionSource;

use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://opentdb.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Upper bound the API accepts for `amount`.
pub const MAX_AMOUNT: u32 = 50;

/// Open Trivia DB question source.
pub struct OpenTdbSource {
    base_url: String,
    amount: u32,
    category: Option<u32>,
    client: reqwest::Client,
}

impl OpenTdbSource {
    pub fn new(base_url: Option<String>, amount: u32, category: Option<u32>) -> Self {
        let base_url = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            amount: amount.clamp(1, MAX_AMOUNT),
            category,
            client,
        }
    }

    fn request_url(&self) -> String {
        let mut url = format!("{}/api.php?amount={}", self.base_url, self.amount);
        if let Some(category) = self.category {
            url.push_str(&format!("&category={category}"));
        }
        url
    }
}

#[derive(Deserialize)]
struct OpenTdbResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<OpenTdbQuestion>,
}

#[derive(Deserialize)]
struct OpenTdbQuestion {
    #[serde(rename = "type")]
    kind: String,
    difficulty: String,
    category: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl OpenTdbQuestion {
    fn into_question(self, index: usize) -> Result<Question, SourceError> {
        let tier: Tier = self
            .difficulty
            .parse()
            .map_err(SourceError::InvalidPayload)?;

        let answer = decode_entities(&self.correct_answer);
        let mut choices: Vec<String> = self
            .incorrect_answers
            .iter()
            .map(|c| decode_entities(c))
            .collect();
        choices.push(answer.clone());

        // The API puts the correct answer apart; choice order must not leak it.
        if self.kind == "boolean" {
            choices.sort_by_key(|c| c != "True");
        } else {
            choices.sort();
        }

        Question::new(
            format!("opentdb-{}", index + 1),
            decode_entities(&self.question),
            choices,
            answer,
            tier,
            decode_entities(&self.category),
        )
        .map_err(|e| SourceError::InvalidPayload(e.to_string()))
    }
}

/// Decode the HTML entities the API uses in its default encoding.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "eacute" => Some('é'),
                "uuml" => Some('ü'),
                "ouml" => Some('ö'),
                "auml" => Some('ä'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    fn name(&self) -> &str {
        "opentdb"
    }

    #[instrument(skip(self), fields(amount = self.amount, category = ?self.category))]
    async fn fetch(&self) -> anyhow::Result<QuestionBank> {
        let response = self
            .client
            .get(self.request_url())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    SourceError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let payload: OpenTdbResponse =
            response.json().await.map_err(|e| SourceError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        if payload.response_code != 0 {
            return Err(SourceError::NoResults(payload.response_code).into());
        }

        let questions = payload
            .results
            .into_iter()
            .enumerate()
            .map(|(i, q)| q.into_question(i))
            .collect::<Result<Vec<_>, _>>()?;

        if questions.is_empty() {
            return Err(SourceError::NoResults(payload.response_code).into());
        }

        tracing::debug!(questions = questions.len(), "fetched trivia questions");

        Ok(QuestionBank {
            id: match self.category {
                Some(c) => format!("opentdb-{c}"),
                None => "opentdb".to_string(),
            },
            name: "Open Trivia DB".to_string(),
            description: format!("{} questions from {}", questions.len(), self.base_url),
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "response_code": 0,
            "results": [
                {
                    "type": "multiple",
                    "difficulty": "easy",
                    "category": "Science &amp; Nature",
                    "question": "What is the symbol for &quot;gold&quot;?",
                    "correct_answer": "Au",
                    "incorrect_answers": ["Ag", "Gd", "Go"]
                },
                {
                    "type": "boolean",
                    "difficulty": "hard",
                    "category": "History",
                    "question": "Rome wasn&#039;t built in a day.",
                    "correct_answer": "False",
                    "incorrect_answers": ["True"]
                }
            ]
        })
    }

    #[tokio::test]
    async fn successful_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "2"))
            .and(query_param("category", "17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let source = OpenTdbSource::new(Some(server.uri()), 2, Some(17));
        let bank = source.fetch().await.unwrap();

        assert_eq!(bank.id, "opentdb-17");
        assert_eq!(bank.questions.len(), 2);

        let gold = &bank.questions[0];
        assert_eq!(gold.id, "opentdb-1");
        assert_eq!(gold.tier, Tier::Easy);
        assert_eq!(gold.prompt, "What is the symbol for \"gold\"?");
        assert_eq!(gold.category, "Science & Nature");
        assert_eq!(gold.choices, vec!["Ag", "Au", "Gd", "Go"]);
        assert!(gold.is_correct("Au"));

        let rome = &bank.questions[1];
        assert_eq!(rome.tier, Tier::Hard);
        assert_eq!(rome.prompt, "Rome wasn't built in a day.");
        assert_eq!(rome.choices, vec!["True", "False"]);
        assert_eq!(rome.answer, "False");
    }

    #[tokio::test]
    async fn non_zero_response_code_is_no_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 1, "results": []})),
            )
            .mount(&server)
            .await;

        let source = OpenTdbSource::new(Some(server.uri()), 10, None);
        let err = source.fetch().await.unwrap_err();
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        assert!(matches!(source_err, SourceError::NoResults(1)));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let source = OpenTdbSource::new(Some(server.uri()), 5, None);
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn unknown_difficulty_is_invalid_payload() {
        let server = MockServer::start().await;
        let mut body = sample_body();
        body["results"][0]["difficulty"] = serde_json::json!("legendary");

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let source = OpenTdbSource::new(Some(server.uri()), 2, None);
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("unknown tier"));
    }

    #[test]
    fn amount_is_clamped() {
        let source = OpenTdbSource::new(None, 500, None);
        assert_eq!(
            source.request_url(),
            "https://opentdb.com/api.php?amount=50"
        );
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&#039;quoted&#x27;"), "'quoted'");
        assert_eq!(decode_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&unknown; &"), "&unknown; &");
    }
}
