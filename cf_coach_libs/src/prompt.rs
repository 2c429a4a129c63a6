use crate::{
    models::Student,
    stats::{self, rating_range_label},
};
use itertools::Itertools;

pub const SYSTEM_PROMPT: &str = r#"You are CF Code Coach, a senior competitive programming advisor with 10+ years of experience coaching ICPC medalists.
Provide expert-level analysis with these guidelines:

1. Format responses in clean HTML with proper spacing
2. Use competitive programming terminology accurately
3. Structure advice in clear sections
4. Include specific problem recommendations with Codeforces links
5. Maintain a professional yet encouraging tone
6. Focus on actionable insights
7. Credit as "CF Code Coach Analysis"

Example format:
<h3>Strengths Analysis</h3>
<p>Your performance in <b>dynamic programming</b> problems is strong...</p>

<h3>Recommended Problem Set</h3>
<ul>
  <li><a href="https://codeforces.com/problemset/problem/1234/D">Problem 1234D - DP Optimization</a> (Rating: 1800) - Focus: dp</li>
</ul>

<p>CF Code Coach Analysis</p>"#;

const RECENT_CONTESTS: usize = 5;

fn rating_or_unrated(rating: Option<i32>) -> String {
    rating
        .map(|rating| rating.to_string())
        .unwrap_or(String::from("unrated"))
}

pub fn performance_analysis(student: &Student) -> String {
    let submissions = student.resolved_submissions();
    let statistics = stats::aggregate(&submissions);

    let rating_changes = stats::recent_contests(&student.contest_history, RECENT_CONTESTS)
        .iter()
        .map(|contest| {
            let date = contest
                .updated_at()
                .map(|time| time.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            format!(
                "- {}: {:+} ({})",
                contest.contest_name,
                contest.delta(),
                date
            )
        })
        .join("\n");
    let distribution = statistics
        .solved_by_rating
        .iter()
        .map(|(bucket, count)| format!("- {}: {} solved", rating_range_label(*bucket), count))
        .join("\n");

    format!(
        r#"Analyze this competitive programmer's profile in depth:

**Student Profile**
- Name: {name}
- Handle: {handle}
- Current Rating: {current}
- Max Rating: {max}
- Problems Attempted: {attempted}
- Problems Solved: {solved}

**Rating History**
{rating_changes}

**Solved Problems Distribution**
{distribution}

Provide a comprehensive analysis with:
1. Detailed strengths assessment
2. Key weaknesses to address
3. Rating trajectory analysis
4. Personalized 2-week training plan
5. Curated problem set (include direct Codeforces links)
6. Contest strategy recommendations
7. Motivational closing thoughts"#,
        name = student.name,
        handle = student.codeforces_handle,
        current = rating_or_unrated(student.current_rating),
        max = rating_or_unrated(student.max_rating),
        attempted = submissions.len(),
        solved = statistics.solved_count(),
        rating_changes = if rating_changes.is_empty() {
            String::from("No contest history available")
        } else {
            rating_changes
        },
        distribution = if distribution.is_empty() {
            String::from("No solved problems data")
        } else {
            distribution
        },
    )
}

pub fn weak_area_plan(student: &Student, weak_area: &str) -> String {
    format!(
        r#"Create an intensive 1-week focused training plan for {name} (Rating: {rating})
to improve their {area} skills.

Include:
1. Fundamental concepts to review
2. 3-5 key problems with increasing difficulty (include Codeforces links)
3. Recommended learning resources
4. Practice techniques
5. Common pitfalls to avoid
6. Self-assessment checklist"#,
        name = student.name,
        rating = rating_or_unrated(student.current_rating),
        area = weak_area,
    )
}

pub fn daily_problems(student: &Student) -> String {
    format!(
        r#"Generate a personalized daily problem set for {name} (Rating: {rating}).

Requirements:
- 5 problems total
- Mix of problem types
- Slightly above current skill level
- Include 1 "challenge" problem
- Direct Codeforces links
- Organized by estimated solving time

Format each problem on its own line as:
Problem <contest><index> - <name> (Rating: X) - Focus: Y"#,
        name = student.name,
        rating = rating_or_unrated(student.current_rating),
    )
}

/// Prepends the coach preamble to a user prompt.
pub fn with_system(prompt: &str) -> String {
    format!("{}\n\nUser Prompt: {}", SYSTEM_PROMPT, prompt)
}
