//! Investment advice service for the investment simulator
//!
//! Wraps a language model provider with the simulator's advisory rules:
//! no guaranteed returns, risks explained, and the company's news analysis
//! summary embedded in the prompt when one is available.
//!
//! # Example
//!
//! ```rust,ignore
//! use invest_advisor::{AdvisorConfig, InvestAdvisor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let companies = invest_core::load_company_data("company_scores.json", "all_prices.json")?;
//!
//!     let advisor = InvestAdvisor::from_config(AdvisorConfig::default().with_env())?;
//!     advisor.initialize().await?;
//!
//!     let answer = advisor.ask("Is now a good time to buy?", Some("삼성전자"), &companies).await;
//!     println!("{answer}");
//!
//!     advisor.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod advisor;
pub mod config;
pub mod error;
pub mod prompts;

pub use advisor::InvestAdvisor;
pub use config::{AdvisorConfig, AdvisorConfigBuilder, ProviderKind};
pub use error::{AdvisorError, Result};
pub use prompts::BilingualTemplate;
