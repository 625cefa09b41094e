//! The chat widget's backend: an OpenAI-compatible completion call with a
//! scripted, intent-based reply whenever the model cannot be used.

use interfaces::{ChatRole, ConversationTurn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AssistantConfig;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+234|0)(?:70|80|81|90|91)\d{8}").expect("valid phone regex"));
static COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:work at|company is)\s+([^.!?]+)").expect("valid company regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ScheduleMeeting,
    ProjectPricing,
    HiringInquiry,
    SkillsInquiry,
    PortfolioInquiry,
    GeneralInquiry,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ScheduleMeeting => "schedule_meeting",
            Intent::ProjectPricing => "project_pricing",
            Intent::HiringInquiry => "hiring_inquiry",
            Intent::SkillsInquiry => "skills_inquiry",
            Intent::PortfolioInquiry => "portfolio_inquiry",
            Intent::GeneralInquiry => "general_inquiry",
        }
    }

    /// First matching rule wins.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["schedule", "meeting", "call", "appointment"]) {
            Intent::ScheduleMeeting
        } else if lower.contains("project") && has(&["cost", "price", "budget"]) {
            Intent::ProjectPricing
        } else if has(&["hire", "available", "work together"]) {
            Intent::HiringInquiry
        } else if has(&["skill", "experience", "expertise"]) {
            Intent::SkillsInquiry
        } else if has(&["project", "portfolio", "work"]) {
            Intent::PortfolioInquiry
        } else {
            Intent::GeneralInquiry
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl Entities {
    pub fn extract(message: &str) -> Self {
        let lower = message.to_lowercase();
        let company = if lower.contains("work at") || lower.contains("company is") {
            COMPANY_RE
                .captures(message)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|c| !c.is_empty())
        } else {
            None
        };

        Entities {
            email: EMAIL_RE.find(message).map(|m| m.as_str().to_string()),
            phone: PHONE_RE.find(message).map(|m| m.as_str().to_string()),
            company,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub intent: Intent,
    pub entities: Entities,
}

pub fn analyze_message(message: &str) -> Analysis {
    Analysis {
        intent: Intent::classify(message),
        entities: Entities::extract(message),
    }
}

const SCHEDULE_REPLY: &str = "I'd be happy to help you schedule a consultation! We can arrange a call to go through your project requirements in detail.

**Available options:**
• **Project Discovery Call** - 30 mins to understand your needs
• **Technical Consultation** - 45 mins deep dive into solutions
• **Proposal Discussion** - 1 hour of detailed project planning

To schedule, I just need your preferred date and time, your email address and a short description of the project.

**Contact directly:**
📧 Email: {email}
📱 Phone: {phone}

Which kind of meeting would suit you best?";

const PRICING_REPLY: &str = "Great question about pricing! Rates depend on scope, but here is a typical range:

**💰 Project types & investment:**
• **Landing pages / small sites:** $500 - $2,000
• **Business web applications:** $2,000 - $8,000
• **E-commerce platforms:** $3,000 - $15,000
• **Custom SaaS solutions:** $10,000 - $50,000+

Every project includes responsive design, SEO and performance tuning, secure backend APIs and post-launch support.

Tell me more about what you want to build and I can prepare a detailed quote.

📧 {email} | 📱 {phone}";

const HIRING_REPLY: &str = "Yes! The developer is currently available for new opportunities.

**💼 Available for:**
• Full-time remote or hybrid positions
• Contract and freelance projects
• Technical consulting
• Team leadership roles

**🎯 Specialties:** React and Next.js applications, e-commerce, SaaS development, database design, API development and integration.

**Ready to discuss your project?**
📧 {email}
📱 {phone}

When would be a good time for a short call?";

const SKILLS_REPLY: &str = "Here is an overview of the technical expertise on offer:

**🎯 Frontend:** React and Next.js, TypeScript, Tailwind CSS, animation, responsive mobile-first design
**⚡ Backend:** Node.js, REST API design, PostgreSQL and MongoDB, authentication and security, cloud deployment
**🛠️ Tooling:** Git, Docker, automated testing, CI/CD pipelines
**📱 Extras:** React Native, GraphQL, real-time features, payment integration, SEO

Want to see how these skills fit your project?

📧 {email} | 📱 {phone}";

const PORTFOLIO_REPLY: &str = "Happy to walk you through the portfolio! Some highlights:

**1. E-Commerce Platform** - full-stack store with payment processing and an admin dashboard
**2. Finance Management App** - budgeting and tracking with real-time charts
**3. Music Streaming Platform** - playlists, audio player and social profiles

All of them are built on a modern TypeScript stack with secure APIs and responsive design.

**Want details or a similar project for your business?**
📧 {email}
📱 {phone}

What kind of project are you considering?";

const GREETING_REPLY: &str = "Hello! 👋 I'm the assistant for this portfolio.

**I can help you:**
1. 📋 Learn about skills and past work
2. 💰 Get project pricing estimates
3. 📅 Schedule a consultation call
4. 🤝 Discuss your specific needs

Contact information:
📧 {email}
📱 {phone}

What would you like to know more about?";

const GENERAL_REPLY: &str = "I'm here to help you connect with an experienced full-stack developer, whether you need a new application, an upgrade to an existing system or technical advice.

**How I can assist:**
• Answer questions about technical capabilities
• Share project examples
• Help schedule a consultation call
• Discuss pricing and timelines

**Direct contact:**
📧 {email}
📱 {phone}

What would you like to know?";

/// The reply used when no model answer is available.
pub fn scripted_reply(message: &str, email: &str, phone: &str) -> String {
    let template = match Intent::classify(message) {
        Intent::ScheduleMeeting => SCHEDULE_REPLY,
        Intent::ProjectPricing => PRICING_REPLY,
        Intent::HiringInquiry => HIRING_REPLY,
        Intent::SkillsInquiry => SKILLS_REPLY,
        Intent::PortfolioInquiry => PORTFOLIO_REPLY,
        Intent::GeneralInquiry => {
            let lower = message.to_lowercase();
            if ["hello", "hi", "hey"].iter().any(|w| lower.contains(w)) {
                GREETING_REPLY
            } else {
                GENERAL_REPLY
            }
        }
    };

    template.replace("{email}", email).replace("{phone}", phone)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion API returned no content")]
    EmptyReply,
}

pub struct Assistant {
    client: Client,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are the AI assistant on a full-stack developer's portfolio site. \
             Help visitors learn about the developer's skills, projects, availability and pricing, \
             and help them schedule a consultation. Be helpful, professional and concise. \
             Developer contact: {}, {}",
            self.config.developer_email, self.config.developer_phone
        )
    }

    /// System prompt, the tail of `history`, then the new message.
    pub fn build_messages(&self, message: &str, history: &[ConversationTurn]) -> Vec<ChatMessage> {
        let skip = history.len().saturating_sub(self.config.context_turns);

        let mut messages = Vec::with_capacity(self.config.context_turns + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: self.system_prompt(),
        });
        messages.extend(history.iter().skip(skip).map(|turn| ChatMessage {
            role: match turn.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            }
            .to_string(),
            content: turn.message.clone(),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });
        messages
    }

    async fn complete(&self, message: &str, history: &[ConversationTurn]) -> Result<String, AssistantError> {
        let api_key = self.config.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: self.build_messages(message, history),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AssistantError::EmptyReply)
    }

    /// Never fails: any completion problem falls back to the scripted reply.
    pub async fn reply(&self, message: &str, history: &[ConversationTurn]) -> String {
        let analysis = analyze_message(message);
        debug!(
            intent = analysis.intent.as_str(),
            email = ?analysis.entities.email,
            phone = ?analysis.entities.phone,
            company = ?analysis.entities.company,
            "Analyzed chat message"
        );

        match self.complete(message, history).await {
            Ok(reply) => reply,
            Err(AssistantError::MissingApiKey) => {
                debug!("No completion API key, using scripted reply");
                self.scripted(message)
            }
            Err(e) => {
                warn!("Completion failed, using scripted reply: {}", e);
                self.scripted(message)
            }
        }
    }

    pub fn scripted(&self, message: &str) -> String {
        scripted_reply(message, &self.config.developer_email, &self.config.developer_phone)
    }
}
