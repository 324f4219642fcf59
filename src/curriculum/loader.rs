use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use tracing::{info, warn};

use crate::curriculum::{Curriculum, CurriculumError, CurriculumPosition, Lesson};
use crate::engine::validator::ValidatorRegistry;

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurriculumSource {
    Embedded,
    Directory(PathBuf),
}

impl CurriculumSource {
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => CurriculumSource::Directory(dir),
            None => CurriculumSource::Embedded,
        }
    }
}

pub fn load(source: &CurriculumSource) -> Result<Curriculum, CurriculumError> {
    let lessons = match source {
        CurriculumSource::Embedded => load_embedded()?,
        CurriculumSource::Directory(dir) => load_dir(dir)?,
    };
    let curriculum = Curriculum::new(lessons);
    info!(
        lessons = curriculum.lesson_count(),
        topics = curriculum.total_topics(),
        ?source,
        "curriculum loaded"
    );
    Ok(curriculum)
}

fn is_lesson_file(name: &str) -> bool {
    name.ends_with(".yaml") || name.ends_with(".yml")
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn load_embedded() -> Result<Vec<Lesson>, CurriculumError> {
    let mut names: Vec<String> = LessonAssets::iter()
        .map(|n| n.to_string())
        .filter(|n| is_lesson_file(n))
        .collect();
    names.sort();

    let mut lessons = Vec::new();
    for name in names {
        let Some(file) = LessonAssets::get(&name) else {
            continue;
        };
        let text = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| CurriculumError::InvalidAsset { name: name.clone() })?;
        lessons.extend(parse_lessons(&name, text)?);
    }
    Ok(lessons)
}

fn load_dir(dir: &Path) -> Result<Vec<Lesson>, CurriculumError> {
    let read_err = |source| CurriculumError::Read {
        path: dir.display().to_string(),
        source,
    };
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_lesson_file)
        })
        .collect();
    paths.sort();

    let mut lessons = Vec::new();
    for path in paths {
        let text = fs::read_to_string(&path).map_err(|source| CurriculumError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        lessons.extend(parse_lessons(&name, &text)?);
    }
    Ok(lessons)
}

/// Parse one YAML document holding a list of lessons. Untitled lessons take
/// the file stem as their title.
pub fn parse_lessons(name: &str, yaml: &str) -> Result<Vec<Lesson>, CurriculumError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut lessons: Vec<Lesson> =
        serde_yaml::from_str(yaml).map_err(|source| CurriculumError::Parse {
            path: name.to_string(),
            source,
        })?;
    for lesson in &mut lessons {
        if lesson.title.trim().is_empty() {
            lesson.title = file_stem(name).to_string();
        }
    }
    Ok(lessons)
}

/// Challenges whose validator id will fall through to default-reject.
pub fn unresolved_challenges(
    curriculum: &Curriculum,
    registry: &ValidatorRegistry,
) -> Vec<(CurriculumPosition, String)> {
    curriculum
        .topics()
        .filter(|(_, t)| t.has_challenge() && !registry.contains(&t.validator_id))
        .map(|(pos, t)| (pos, t.validator_id.clone()))
        .collect()
}

pub fn warn_unresolved(curriculum: &Curriculum, registry: &ValidatorRegistry) {
    for (pos, id) in unresolved_challenges(curriculum, registry) {
        warn!(
            lesson = pos.lesson,
            topic = pos.topic,
            validator = %id,
            "challenge has no registered validator; answers will always be rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
- title: Passwords
  topics:
    - title: Strong passwords
      content: Use long passphrases.
      challenge: Type a strong password
      challengeType: passwordStrength
    - title: Recap
      content: Done.
- topics:
    - title: Untitled lesson topic
      content: body
      challenge: pick
      validator: freeResponse
"#;

    #[test]
    fn test_parse_lessons_fields() {
        let lessons = parse_lessons("01-passwords.yaml", SAMPLE).unwrap();
        assert_eq!(lessons.len(), 2);
        let strong = &lessons[0].topics[0];
        assert_eq!(strong.validator_id, "passwordStrength");
        assert!(strong.has_challenge());
        assert!(!strong.is_completed());
        assert!(!lessons[0].topics[1].has_challenge());
        assert_eq!(lessons[1].topics[0].validator_id, "freeResponse");
    }

    #[test]
    fn test_untitled_lesson_takes_file_stem() {
        let lessons = parse_lessons("01-passwords.yaml", SAMPLE).unwrap();
        assert_eq!(lessons[1].title, "01-passwords");
    }

    #[test]
    fn test_empty_document_is_empty_list() {
        assert!(parse_lessons("x.yaml", "  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_is_reported_with_file() {
        let err = parse_lessons("broken.yaml", "- title: [unclosed").unwrap_err();
        assert!(matches!(err, CurriculumError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_load_dir_orders_by_file_name_and_skips_other_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.yaml"), "- title: Second\n  topics: []\n").unwrap();
        fs::write(dir.path().join("a.yml"), "- title: First\n  topics: []\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let curriculum = load(&CurriculumSource::Directory(dir.path().to_path_buf())).unwrap();
        let titles: Vec<&str> = curriculum.lessons().iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_load_empty_dir_is_empty_curriculum() {
        let dir = TempDir::new().unwrap();
        let curriculum = load(&CurriculumSource::Directory(dir.path().to_path_buf())).unwrap();
        assert!(curriculum.is_empty());
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = load(&CurriculumSource::Directory(missing)).unwrap_err();
        assert!(matches!(err, CurriculumError::Read { .. }));
    }

    #[test]
    fn test_corrupt_file_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.yaml"), "- title: Fine\n  topics: []\n").unwrap();
        fs::write(dir.path().join("b.yaml"), "{{ not yaml").unwrap();
        assert!(load(&CurriculumSource::Directory(dir.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_embedded_curriculum_loads_and_resolves() {
        let curriculum = load(&CurriculumSource::Embedded).unwrap();
        assert!(!curriculum.is_empty());
        let registry = ValidatorRegistry::builtin();
        assert!(unresolved_challenges(&curriculum, &registry).is_empty());
    }

    #[test]
    fn test_unresolved_challenges_reports_unknown_and_missing_ids() {
        let lessons = parse_lessons(
            "x.yaml",
            r#"
- title: L
  topics:
    - title: no id
      challenge: answer me
    - title: unknown id
      challenge: answer me
      challengeType: noSuchValidator
    - title: no challenge
      challengeType: noSuchValidator
"#,
        )
        .unwrap();
        let curriculum = Curriculum::new(lessons);
        let unresolved = unresolved_challenges(&curriculum, &ValidatorRegistry::builtin());
        assert_eq!(unresolved.len(), 2);
        assert_eq!(unresolved[1].1, "noSuchValidator");
    }
}
