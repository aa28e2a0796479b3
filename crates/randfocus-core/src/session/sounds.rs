use super::schedule::RandomSource;

/// Sounds available to a session: a pool for breaks and one for the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundPool {
    break_sounds: Vec<String>,
    end_sound: Option<String>,
}

impl SoundPool {
    pub fn new(break_sounds: Vec<String>, end_sound: Option<String>) -> Self {
        Self {
            break_sounds,
            end_sound,
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn break_sounds(&self) -> &[String] {
        &self.break_sounds
    }

    pub fn end_sound(&self) -> Option<&str> {
        self.end_sound.as_deref()
    }

    /// Pick a random break sound not yet in `used`, or `None` if the pool is exhausted.
    pub fn pick_unused<R: RandomSource>(&self, used: &[String], rng: &mut R) -> Option<String> {
        let available: Vec<&String> = self
            .break_sounds
            .iter()
            .filter(|s| !used.contains(s))
            .collect();
        if available.is_empty() {
            return None;
        }
        let last = u32::try_from(available.len() - 1).unwrap_or(u32::MAX);
        let idx = rng.int_inclusive(0, last) as usize;
        available.get(idx).map(|s| (*s).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::schedule::FixedSource;

    fn pool() -> SoundPool {
        SoundPool::new(
            vec!["a".into(), "b".into(), "c".into()],
            Some("end".into()),
        )
    }

    #[test]
    fn picks_only_unused_sounds() {
        let mut rng = FixedSource::new([0, 0, 0]);
        let used = vec!["a".to_string()];
        assert_eq!(pool().pick_unused(&used, &mut rng).as_deref(), Some("b"));
        let used = vec!["a".to_string(), "b".to_string()];
        assert_eq!(pool().pick_unused(&used, &mut rng).as_deref(), Some("c"));
    }

    #[test]
    fn index_comes_from_random_source() {
        let mut rng = FixedSource::new([2]);
        assert_eq!(pool().pick_unused(&[], &mut rng).as_deref(), Some("c"));
    }

    #[test]
    fn exhausted_pool_gives_none() {
        let mut rng = FixedSource::new([]);
        let used: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        assert!(pool().pick_unused(&used, &mut rng).is_none());
        assert!(SoundPool::silent().pick_unused(&[], &mut rng).is_none());
    }
}
