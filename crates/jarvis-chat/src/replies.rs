//! Canned replies used when no language model answers.

/// Returned when nothing else matches. Signals a failed result.
pub const GENERIC_REPLY: &str = "I'm here to help! You can ask me questions, request tasks like \
                                 playing music, checking time, or just have a conversation with me.";

/// Keyword to reply, checked in order; the first keyword contained in the
/// lowercased utterance wins.
pub static CANNED_REPLIES: &[(&str, &str)] = &[
    (
        "what is ai",
        "Artificial Intelligence (AI) is the simulation of human intelligence in machines that \
         are programmed to think and learn like humans. AI systems can perform tasks such as \
         visual perception, speech recognition, decision-making, and language translation.",
    ),
    (
        "artificial intelligence",
        "AI refers to computer systems that can perform tasks typically requiring human \
         intelligence, such as learning, reasoning, problem-solving, and understanding natural \
         language.",
    ),
    (
        "hello",
        "Hello! I'm Jarvis, your AI assistant. How can I help you today?",
    ),
    ("hi", "Hi there! What can I do for you?"),
    (
        "how are you",
        "I'm doing great! Thanks for asking. How are you?",
    ),
    ("what is your name", "I'm Jarvis, your AI assistant."),
    (
        "help",
        "I can help you with various tasks like answering questions, playing music, telling \
         time, searching the web, sending emails, and more!",
    ),
    ("bye", "Goodbye! Have a great day!"),
    ("thank you", "You're welcome! Happy to help!"),
    (
        "weather",
        "I don't have real-time weather data, but you can ask me to search Google for current \
         weather information.",
    ),
    (
        "joke",
        "Why don't scientists trust atoms? Because they make up everything!",
    ),
    (
        "what can you do",
        "I can answer questions, play music on YouTube, tell time and date, open applications, \
         search Google and Wikipedia, send emails, and have conversations with you!",
    ),
    (
        "machine learning",
        "Machine Learning is a subset of AI that enables computers to learn and improve from \
         experience without being explicitly programmed. It uses algorithms to analyze data and \
         make predictions.",
    ),
    (
        "python",
        "Python is a high-level programming language known for its simplicity and readability. \
         It's widely used in web development, data science, AI, and automation.",
    ),
    (
        "programming",
        "Programming is the process of creating instructions for computers to follow. It \
         involves writing code in various languages like Python, JavaScript, Java, and others.",
    ),
];

/// First canned reply whose keyword occurs in `text` (already lowercased).
pub fn canned_reply(text: &str) -> Option<&'static str> {
    CANNED_REPLIES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, reply)| *reply)
}
