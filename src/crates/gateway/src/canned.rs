//! Canned answers for greetings and FAQ prompts.
//!
//! Simple inputs like "hi" or "what can you do" are answered from a fixed
//! table instead of a round trip to the model. Lookups go through
//! [`normalize_greeting`], so `"Hello!"` and `"  hello  "` hit the same entry.

use std::collections::HashMap;

/// The built-in HPGPT table.
const DEFAULT_RESPONSES: &[(&str, &str)] = &[
    (
        "hi",
        "Hello! 👋 I'm **HPGPT**, your AI assistant for **HPCL**.\n\nHow can I help you today?",
    ),
    (
        "hello",
        "Hi there! 🌟 I'm **HPGPT**, ready to assist you with:\n\n• **HPCL-related queries**\n• **Document analysis**\n• **Websearch & insights**\n• **Coding & automation**\n\nWhat would you like to explore?",
    ),
    (
        "hey",
        "Hey! 🚀 I'm **HPGPT**, your dedicated HPCL AI assistant.\n\nWhat can I help you with today?",
    ),
    (
        "how are you",
        "I'm doing great, thank you for asking! 😊 I'm **HPGPT**, your AI assistant for **HPCL**, and I'm here and ready to help you with:\n\n• **HPCL operations and services**\n• **Document analysis and processing**\n• **Websearch and market insights**\n• **Technical assistance and coding**\n• **Data analytics and reporting**\n\nHow are you doing today? What can I assist you with?",
    ),
    (
        "good morning",
        "Good morning! ☀️ I'm **HPGPT**, your AI assistant for **HPCL**.\n\nReady to help you start your day productively! What's on your agenda?",
    ),
    (
        "good afternoon",
        "Good afternoon! 🌅 I'm **HPGPT**, here to assist you with any **HPCL-related** tasks or questions.\n\nHow can I support you today?",
    ),
    (
        "good evening",
        "Good evening! 🌆 I'm **HPGPT**, your HPCL AI assistant.\n\nHow can I help you wind down with some productive work?",
    ),
    (
        "what is your purpose",
        "I'm **HPGPT**, an AI assistant specifically designed for **HPCL (Hindustan Petroleum Corporation Limited)**.\n\n## My Core Capabilities:\n\n### 📄 **Document Analysis**\n• PDF processing and summarization\n• Invoice and report analysis\n• Contract review and insights\n\n### 📊 **Data Analytics**\n• Business intelligence and insights\n• Performance reporting\n• Trend analysis\n\n### 🔬 **Websearch & Intelligence**\n• Market research and competitor analysis\n• Industry trends and forecasting\n• Strategic insights\n\n### 💻 **Coding & Automation**\n• Script generation and debugging\n• API development\n• Process automation\n\n### ❓ **General Assistance**\n• HPCL-related queries\n• Technical support\n• Strategic guidance\n\n*What would you like me to help you with?*",
    ),
    (
        "who are you",
        "I'm **HPGPT** 🤖, your dedicated AI assistant for **HPCL**.\n\n**My Mission:** To help HPCL professionals with:\n• Document analysis & processing\n• Websearch & market insights\n• Coding & automation solutions\n• Strategic decision support\n\n*Think of me as your intelligent workplace companion!*",
    ),
    (
        "what can you do",
        "Great question! Here's what I can help you with:\n\n## 🎯 **Core Services**\n\n### 📄 **Document Processing**\n• **PDF Analysis** - Extract insights from reports\n• **Invoice Processing** - Automate data extraction\n• **Contract Review** - Identify key terms and risks\n\n### 📊 **Business Analytics**\n• **Performance Dashboards** - KPI tracking and visualization\n• **Trend Analysis** - Market and operational insights\n• **Predictive Analytics** - Forecasting and planning\n\n### 🔍 **Websearch & Intelligence**\n• **Market Research** - Competitor and industry analysis\n• **Strategic Planning** - Data-driven recommendations\n• **Regulatory Updates** - Compliance and policy insights\n\n### ⚙️ **Automation & Development**\n• **Script Generation** - Python, SQL, and more\n• **API Development** - Custom integrations\n• **Process Automation** - Workflow optimization\n\n### 💡 **Strategic Support**\n• **Decision Analysis** - Data-backed recommendations\n• **Risk Assessment** - Identify and mitigate risks\n• **Innovation Ideas** - Technology and process improvements\n\n*What specific area interests you most?*",
    ),
    (
        "help",
        "I'm here to help! 🆘 I'm **HPGPT**, your comprehensive HPCL AI assistant.\n\n## 🚀 **Quick Start Guide**\n\n### **Popular Commands:**\n• *\"Analyze this document\"* - Upload PDFs for analysis\n• *\"Websearch market trends\"* - Get industry insights\n• *\"Generate a Python script\"* - Coding assistance\n• *\"What's new in petroleum industry?\"* - Latest updates\n\n### **Pro Tips:**\n• Be specific with your requests\n• Upload files for detailed analysis\n• Ask follow-up questions for deeper insights\n\n*Just ask me anything - I'm here to make your work easier!*",
    ),
    (
        "what is hpcl",
        "**HPCL (Hindustan Petroleum Corporation Limited)** 🏢\n\n## **Company Overview**\n\n### **Key Facts:**\n• **Founded:** 1974\n• **Headquarters:** Mumbai, India\n• **Industry:** Oil & Gas, Petroleum Refining\n• **Employees:** 10,000+ professionals\n\n### **Core Business Areas:**\n\n#### 🏭 **Refining Operations**\n• **Refineries:** Mumbai, Visakhapatnam, and more\n• **Capacity:** Millions of metric tons annually\n• **Products:** Petrol, diesel, aviation fuel, LPG\n\n#### ⛽ **Marketing & Distribution**\n• **Retail Outlets:** Thousands across India\n• **Brand:** HP (Hindustan Petroleum)\n• **Services:** Fuel, lubricants, convenience stores\n\n#### 🔬 **Innovation & Technology**\n• **R&D Centers:** Advanced Websearch\n• **Green Energy:** Renewable energy initiatives\n• **Digital Transformation:** Modern technology adoption\n\n### **Strategic Focus:**\n• **Sustainability** - Environmental responsibility\n• **Innovation** - Cutting-edge technology\n• **Customer Excellence** - Superior service delivery\n• **Growth** - Expanding market presence\n\n*I'm here to help you with any HPCL-related questions or tasks!*",
    ),
];

/// Normalize user text into a table key.
///
/// Lower-cases, trims surrounding whitespace, then strips trailing `!`, `?`
/// and `.` runs in that order. Each strip runs once, so `"hi?!"` becomes
/// `"hi"` while `"hi!?"` keeps its `!`.
pub fn normalize_greeting(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .trim_end_matches('!')
        .trim_end_matches('?')
        .trim_end_matches('.')
        .to_string()
}

/// Immutable mapping from normalized greeting to answer.
///
/// Greeting detection is key membership, so detection and lookup cannot
/// drift apart.
#[derive(Debug, Clone)]
pub struct CannedResponses {
    entries: HashMap<String, String>,
}

impl CannedResponses {
    /// Build a table from custom entries. Keys are normalized on insert.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, answer)| (normalize_greeting(key.as_ref()), answer.into()))
            .collect();
        Self { entries }
    }

    /// Whether `text` normalizes to a known greeting or FAQ phrase.
    pub fn is_canned_greeting(&self, text: &str) -> bool {
        self.entries.contains_key(&normalize_greeting(text))
    }

    /// The pre-written answer for `text`, if one exists and is non-empty.
    pub fn canned_response(&self, text: &str) -> Option<&str> {
        self.entries
            .get(&normalize_greeting(text))
            .map(String::as_str)
            .filter(|answer| !answer.trim().is_empty())
    }

    /// Normalized phrases in the table, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::from_entries(DEFAULT_RESPONSES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_greeting() {
        assert_eq!(normalize_greeting("Hi!"), "hi");
        assert_eq!(normalize_greeting("  HELLO  "), "hello");
        assert_eq!(normalize_greeting("who are you?"), "who are you");
        assert_eq!(normalize_greeting("help..."), "help");
        assert_eq!(normalize_greeting("hi?!"), "hi");
        assert_eq!(normalize_greeting("hi!?"), "hi!");
        assert_eq!(normalize_greeting("hi !"), "hi ");
    }

    #[test]
    fn test_default_table_detects_greetings() {
        let canned = CannedResponses::default();

        assert!(canned.is_canned_greeting("Hi!"));
        assert!(canned.is_canned_greeting("  HELLO  "));
        assert!(canned.is_canned_greeting("who are you?"));
        assert!(canned.is_canned_greeting("What is HPCL?"));
        assert!(!canned.is_canned_greeting("hi there"));
        assert!(!canned.is_canned_greeting("say hello"));
        assert!(!canned.is_canned_greeting(""));
    }

    #[test]
    fn test_every_key_has_an_answer() {
        let canned = CannedResponses::default();
        assert_eq!(canned.len(), 12);

        for key in canned.keys() {
            assert!(canned.is_canned_greeting(key), "{key} not detected");
            let answer = canned.canned_response(key).expect(key);
            assert!(!answer.is_empty());
        }
    }

    #[test]
    fn test_canned_response_lookup() {
        let canned = CannedResponses::default();
        let answer = canned.canned_response("Hello!").unwrap();
        assert!(answer.starts_with("Hi there!"));
        assert!(canned.canned_response("tell me a joke").is_none());
    }

    #[test]
    fn test_custom_entries_are_normalized() {
        let canned = CannedResponses::from_entries([("  Ping! ", "pong"), ("blank", "  ")]);

        assert!(canned.is_canned_greeting("PING"));
        assert_eq!(canned.canned_response("ping."), Some("pong"));

        assert!(canned.is_canned_greeting("blank"));
        assert_eq!(canned.canned_response("blank"), None);
    }
}
