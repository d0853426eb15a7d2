//! Bilingual prompt templates for the advisor
//!
//! Templates use MiniJinja syntax and come in English and Korean variants.
//! The news summary block is only emitted when a summary is available.

use crate::error::{AdvisorError, Result};
use invest_core::Language;
use minijinja::Environment;

/// A prompt template with one source per supported language
#[derive(Debug, Clone)]
pub struct BilingualTemplate {
    name: &'static str,
    english: &'static str,
    korean: &'static str,
}

impl BilingualTemplate {
    /// Create a template, checking that both variants parse
    pub fn new(name: &'static str, english: &'static str, korean: &'static str) -> Result<Self> {
        let env = Environment::new();
        for (language, source) in [(Language::English, english), (Language::Korean, korean)] {
            env.template_from_str(source)
                .map_err(|e| AdvisorError::TemplateParse {
                    name: name.to_string(),
                    language: language.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(Self {
            name,
            english,
            korean,
        })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn raw_template(&self, language: Language) -> &str {
        match language {
            Language::English => self.english,
            Language::Korean => self.korean,
        }
    }

    /// Render the variant for `language` with `vars`
    pub fn render(&self, language: Language, vars: &serde_json::Value) -> Result<String> {
        let env = Environment::new();
        let value = minijinja::Value::from_serialize(vars);

        env.render_str(self.raw_template(language), value)
            .map_err(|e| AdvisorError::Render {
                name: self.name.to_string(),
                detail: e.to_string(),
            })
    }
}

/// System prompt for free-form questions
///
/// Variables: `summary` (optional news analysis summary)
pub fn advisor_system() -> Result<BilingualTemplate> {
    BilingualTemplate::new(
        "advisor.system",
        r#"You are the Korean stock investment advisor of the "AI Stock Investment Simulator" service.
- Never guarantee returns. Always explain the risks along with the pros and cons.
- When the user names a company, make active use of the [News analysis summary] below.
- Do not write at length. Summarize the key points in about 5 to 10 sentences.
{%- if summary %}

[News analysis summary]
{{ summary }}
[End of summary]
{%- endif %}"#,
        r"너는 'AI 주식 투자 시뮬레이터' 서비스의 한국 주식 투자 상담 AI다.
- 수익률을 보장하지 말고, 항상 리스크와 장단점을 설명해라.
- 사용자가 종목을 지정한 경우, 아래 [뉴스 분석 요약] 정보를 적극적으로 활용해라.
- 너무 장문으로 말하지 말고 5~10문장 정도로 핵심만 정리해라.
{%- if summary %}

[뉴스 분석 요약]
{{ summary }}
[요약 끝]
{%- endif %}",
    )
}

/// System prompt for recommendations over a ranked candidate list
///
/// Variables: `companies` (compact JSON array), `count`
pub fn recommend_system() -> Result<BilingualTemplate> {
    BilingualTemplate::new(
        "advisor.recommend",
        r#"You are the Korean stock investment advisor of the "AI Stock Investment Simulator" service.
- Only discuss companies from the candidate list below.
- Each candidate has a news sentiment `score`, the number of positive, negative and neutral articles, and the latest `price` when known.
- Never guarantee returns. Always explain the risks along with the pros and cons.
- Do not write at length. Summarize the key points in about 5 to 10 sentences.

[Candidate companies ({{ count }})]
{{ companies }}
[End of candidates]"#,
        r"너는 'AI 주식 투자 시뮬레이터' 서비스의 한국 주식 투자 상담 AI다.
- 아래 후보 종목 목록에 있는 종목만 다뤄라.
- 각 후보에는 뉴스 감성 점수(score), 호재/악재/중립 기사 수, 그리고 알려진 경우 최신 가격(price)이 있다.
- 수익률을 보장하지 말고, 항상 리스크와 장단점을 설명해라.
- 너무 장문으로 말하지 말고 5~10문장 정도로 핵심만 정리해라.

[후보 종목 ({{ count }}개)]
{{ companies }}
[후보 끝]",
    )
}

/// Question used by `recommend` when the caller gives none
pub fn default_recommend_question(language: Language) -> &'static str {
    match language {
        Language::English => "Which of these companies look most promising right now, and why?",
        Language::Korean => "지금 가장 유망해 보이는 종목과 그 이유를 알려줘.",
    }
}

/// Reply for an empty question
pub fn empty_question_message(language: Language) -> &'static str {
    match language {
        Language::English => "Please enter a question.",
        Language::Korean => "질문을 입력해 주세요.",
    }
}

/// Reply when the model call fails
pub fn model_error_message(language: Language, detail: &str) -> String {
    match language {
        Language::English => format!("AI model error: {detail}"),
        Language::Korean => format!("AI 서버 오류: {detail}"),
    }
}
