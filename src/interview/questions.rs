use super::types::{Question, QuestionKind};

/// Built-in question set used when setup is skipped
pub fn default_questions() -> Vec<Question> {
    use QuestionKind::{Behavioral, Technical};

    vec![
        Question::new(
            "1",
            "Tell me about a time when you had to work with a difficult team member. How did you handle the situation?",
            Behavioral,
            Some("Teamwork"),
        ),
        Question::new(
            "2",
            "Describe a project where you had to meet a tight deadline. How did you manage your time and resources?",
            Behavioral,
            Some("Time Management"),
        ),
        Question::new(
            "3",
            "Can you walk through your approach to solving a complex problem? Share a specific example.",
            Behavioral,
            Some("Problem Solving"),
        ),
        Question::new(
            "4",
            "Tell me about a time you received critical feedback. How did you respond to it?",
            Behavioral,
            Some("Growth Mindset"),
        ),
        Question::new(
            "5",
            "Describe a situation where you had to make a difficult decision with limited information.",
            Behavioral,
            Some("Decision Making"),
        ),
        Question::new(
            "6",
            "Explain the difference between useMemo and useCallback in React, and when you would use each.",
            Technical,
            Some("React"),
        ),
        Question::new(
            "7",
            "How would you optimize the performance of a React application that is rendering slowly?",
            Technical,
            Some("Performance"),
        ),
        Question::new(
            "8",
            "Explain how you would implement authentication in a React application.",
            Technical,
            Some("Security"),
        ),
        Question::new(
            "9",
            "What is the virtual DOM in React, and how does it improve performance?",
            Technical,
            Some("React Fundamentals"),
        ),
        Question::new(
            "10",
            "Describe the difference between server-side rendering and client-side rendering. What are the pros and cons of each?",
            Technical,
            Some("Web Architecture"),
        ),
    ]
}
