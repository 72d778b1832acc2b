use super::*;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use unicode_normalization::UnicodeNormalization;

use crate::results::record_result;
use crate::table;

/// The three free-text forms a trainee submits for one verb.
#[derive(Debug, Clone, Default)]
pub struct TrainingAnswer {
    pub verb_id: i32,
    pub infinitive: String,
    pub simple_past: String,
    pub past_participle: String,
}

#[derive(Debug)]
pub struct GradedVerb {
    pub verb: Verb,
    pub is_success: bool,
}

/// A uniform random sample, without replacement, of the table's member
/// verbs. The sample never exceeds the table size.
pub fn draw_sample(conn: &mut PgConnection,
                   profile: &Profile,
                   table_id: i32,
                   sample_size: usize)
                   -> Result<Vec<Verb>> {
    use rand::seq::SliceRandom;

    let table = table::get_table(conn, table_id)?;
    table::check_access(&table, profile)?;

    let verbs = table::member_verbs(conn, &table)?;
    let amount = sample_size.min(verbs.len());

    let mut rng = rand::thread_rng();
    Ok(verbs.choose_multiple(&mut rng, amount).cloned().collect())
}

fn normalize(form: &str) -> String {
    form.trim().nfc().collect::<String>().to_lowercase()
}

/// A stored form field may pack several accepted spellings, separated by
/// `,` or `/` ("was/were", "learned, learnt").
fn accepted_spellings(field: &str) -> Vec<String> {
    field.split(|c| c == ',' || c == '/')
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect()
}

fn form_matches(field: &str, submitted: &str) -> bool {
    let submitted = normalize(submitted);
    if submitted.is_empty() {
        return false;
    }
    accepted_spellings(field).iter().any(|accepted| *accepted == submitted)
}

/// All three forms must match one of their accepted spellings. No partial
/// credit.
pub fn grade(verb: &Verb, answer: &TrainingAnswer) -> bool {
    form_matches(&verb.infinitive, &answer.infinitive)
        && form_matches(&verb.simple_past, &answer.simple_past)
        && form_matches(&verb.past_participle, &answer.past_participle)
}

/// Grades a round of submitted answers and writes each outcome into the
/// ledger. No state is kept beyond the recorded rows.
pub fn grade_and_record(conn: &mut PgConnection,
                        profile: &Profile,
                        table_id: i32,
                        answers: &[TrainingAnswer])
                        -> Result<Vec<GradedVerb>> {
    use crate::schema::verbs;

    let mut graded = Vec::with_capacity(answers.len());
    for answer in answers {
        let verb: Option<Verb> = verbs::table
            .filter(verbs::id.eq(answer.verb_id))
            .get_result(conn)
            .optional()?;
        let verb = match verb {
            Some(verb) => verb,
            None => bail!(ErrorKind::InvalidInput),
        };

        let is_success = grade(&verb, answer);
        record_result(conn, profile, table_id, verb.id, is_success)?;
        graded.push(GradedVerb { verb, is_success });
    }
    Ok(graded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verb(infinitive: &str, simple_past: &str, past_participle: &str) -> Verb {
        Verb {
            id: 1,
            infinitive: infinitive.into(),
            simple_past: simple_past.into(),
            past_participle: past_participle.into(),
            translation: "commencer".into(),
            similarity_id: None,
        }
    }

    fn answer(infinitive: &str, simple_past: &str, past_participle: &str) -> TrainingAnswer {
        TrainingAnswer {
            verb_id: 1,
            infinitive: infinitive.into(),
            simple_past: simple_past.into(),
            past_participle: past_participle.into(),
        }
    }

    #[test]
    fn test_exact_match_succeeds() {
        let v = verb("begin", "began", "begun");
        assert!(grade(&v, &answer("begin", "began", "begun")));
    }

    #[test]
    fn test_grading_ignores_case_and_whitespace() {
        let v = verb("begin", "began", "begun");
        assert!(grade(&v, &answer("  Begin ", "BEGAN", "beGun")));
    }

    #[test]
    fn test_any_alternative_is_accepted() {
        let v = verb("get", "got", "got/gotten");
        assert!(grade(&v, &answer("get", "got", "gotten")));
        assert!(grade(&v, &answer("get", "got", "got")));

        let v = verb("learn", "learned, learnt", "learned, learnt");
        assert!(grade(&v, &answer("learn", "learnt", "learned")));
    }

    #[test]
    fn test_all_three_forms_are_required() {
        let v = verb("begin", "began", "begun");
        assert!(!grade(&v, &answer("begin", "began", "began")));
        assert!(!grade(&v, &answer("begin", "begun", "begun")));
        assert!(!grade(&v, &answer("wrong", "began", "begun")));
    }

    #[test]
    fn test_empty_submission_fails() {
        let v = verb("begin", "began", "begun");
        assert!(!grade(&v, &answer("", "", "")));
        assert!(!grade(&v, &answer("begin", "began", "")));
    }

    #[test]
    fn test_no_substring_credit() {
        let v = verb("begin", "began", "begun");
        assert!(!grade(&v, &answer("begins", "began", "begun")));
        assert!(!grade(&v, &answer("beg", "began", "begun")));
    }

    #[test]
    fn test_unicode_normalization_agrees() {
        // "é" composed vs. "e" + combining acute
        let v = verb("céder", "céda", "cédé");
        assert!(grade(&v, &answer("c\u{0065}\u{0301}der", "céda", "cédé")));
    }

    #[test]
    fn test_accepted_spellings_split() {
        assert_eq!(accepted_spellings("got/gotten"), vec!["got", "gotten"]);
        assert_eq!(accepted_spellings("learned, learnt"), vec!["learned", "learnt"]);
        assert_eq!(accepted_spellings("was/were, been"), vec!["was", "were", "been"]);
        assert_eq!(accepted_spellings("begin"), vec!["begin"]);
    }
}
