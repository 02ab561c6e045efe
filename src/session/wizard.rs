use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{AppError, AppResult};
use crate::models::profile::{validate_name, AgeGroup, Language, ReaderProfile};
use crate::models::Recommendation;
use crate::services::recommendations::{self, DEFAULT_LIMIT};
use crate::session::store::{self, SessionStore, WIZARD_STORAGE_KEY};

/// Wizard steps, in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Name,
    Age,
    Interests,
    Genre,
    Language,
    Results,
}

pub const STEPS: [Step; 6] = [
    Step::Name,
    Step::Age,
    Step::Interests,
    Step::Genre,
    Step::Language,
    Step::Results,
];

/// Profile under construction; every field starts unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub language: Option<Language>,
}

impl DraftProfile {
    /// The completed profile, if every required field is set
    fn finalize(&self) -> Option<ReaderProfile> {
        let name = validate_name(&self.name).ok()?;
        Some(ReaderProfile {
            name,
            age_group: self.age_group?,
            interests: self.interests.clone(),
            genres: self.genres.clone(),
            language: self.language?,
        })
    }
}

/// Persisted wizard blob
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WizardBlob {
    #[serde(default)]
    wizard_data: DraftProfile,
    #[serde(default)]
    completed_steps: Vec<Step>,
}

/// Guided questionnaire state
///
/// Collects the reader profile step by step. The profile stays mutable until
/// the results step computes recommendations; after that every field update
/// is rejected until [`reset`](WizardSession::reset).
pub struct WizardSession {
    store: Arc<dyn SessionStore>,
    catalog: Arc<Catalog>,
    draft: DraftProfile,
    completed: Vec<Step>,
    current: Step,
    recommendations: Vec<Recommendation>,
    /// Set when recommendations have been computed, even to an empty list;
    /// the profile is frozen from that point until reset.
    computed: bool,
}

impl WizardSession {
    /// Restores the wizard from the store, or starts fresh
    pub fn load(store: Arc<dyn SessionStore>, catalog: Arc<Catalog>) -> Self {
        let blob: WizardBlob =
            store::load_json(store.as_ref(), WIZARD_STORAGE_KEY).unwrap_or_default();
        Self {
            store,
            catalog,
            draft: blob.wizard_data,
            completed: blob.completed_steps,
            current: Step::Name,
            recommendations: Vec::new(),
            computed: false,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn draft(&self) -> &DraftProfile {
        &self.draft
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// The finished profile, available once recommendations are computed
    pub fn profile(&self) -> Option<ReaderProfile> {
        self.draft.finalize()
    }

    pub fn is_step_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    /// Validation for each step
    pub fn is_step_valid(&self, step: Step) -> bool {
        match step {
            Step::Name => validate_name(&self.draft.name).is_ok(),
            Step::Age => self.draft.age_group.is_some(),
            Step::Interests => !self.draft.interests.is_empty(),
            Step::Genre => !self.draft.genres.is_empty(),
            Step::Language => self.draft.language.is_some(),
            Step::Results => true,
        }
    }

    pub fn set_name(&mut self, name: &str) -> AppResult<()> {
        self.update(|draft| draft.name = name.to_string())
    }

    pub fn set_age_group(&mut self, age_group: AgeGroup) -> AppResult<()> {
        self.update(|draft| draft.age_group = Some(age_group))
    }

    pub fn set_interests(&mut self, interests: Vec<String>) -> AppResult<()> {
        self.update(|draft| draft.interests = interests)
    }

    pub fn set_genres(&mut self, genres: Vec<String>) -> AppResult<()> {
        self.update(|draft| draft.genres = genres)
    }

    pub fn set_language(&mut self, language: Language) -> AppResult<()> {
        self.update(|draft| draft.language = Some(language))
    }

    fn update(&mut self, apply: impl FnOnce(&mut DraftProfile)) -> AppResult<()> {
        if self.computed {
            return Err(AppError::Validation(
                "Profile is locked once recommendations are computed; restart to change it"
                    .to_string(),
            ));
        }
        apply(&mut self.draft);
        self.persist();
        Ok(())
    }

    /// Advances past the current step if it validates
    ///
    /// Returns the step now showing. Reaching the results step computes the
    /// recommendations and freezes the profile.
    pub fn next_step(&mut self) -> Step {
        if !self.is_step_valid(self.current) {
            return self.current;
        }

        if !self.completed.contains(&self.current) {
            self.completed.push(self.current);
            self.persist();
        }

        let index = STEPS.iter().position(|s| *s == self.current).unwrap_or(0);
        if index + 1 < STEPS.len() {
            self.go_to_step(STEPS[index + 1]);
        }
        self.current
    }

    pub fn previous_step(&mut self) -> Step {
        let index = STEPS.iter().position(|s| *s == self.current).unwrap_or(0);
        if index > 0 {
            self.current = STEPS[index - 1];
        }
        self.current
    }

    pub fn go_to_step(&mut self, step: Step) {
        self.current = step;
        if step == Step::Results {
            self.compute_recommendations();
        }
    }

    /// Clears everything and returns to the first step
    pub fn reset(&mut self) {
        self.draft = DraftProfile::default();
        self.completed.clear();
        self.recommendations.clear();
        self.computed = false;
        self.current = Step::Name;
        self.store.remove(WIZARD_STORAGE_KEY);
    }

    fn compute_recommendations(&mut self) {
        let Some(profile) = self.draft.finalize() else {
            return;
        };
        self.recommendations =
            recommendations::recommend(&profile, &self.catalog, DEFAULT_LIMIT);
        // Computation freezes the profile even when nothing matched.
        self.computed = true;
        tracing::info!(
            count = self.recommendations.len(),
            "wizard computed recommendations"
        );
    }

    fn persist(&self) {
        let blob = WizardBlob {
            wizard_data: self.draft.clone(),
            completed_steps: self.completed.clone(),
        };
        if let Err(e) = store::save_json(self.store.as_ref(), WIZARD_STORAGE_KEY, &blob) {
            tracing::warn!(error = %e, "failed to persist wizard state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use crate::session::store::MemorySessionStore;

    fn new_session() -> WizardSession {
        WizardSession::load(
            Arc::new(MemorySessionStore::new()),
            Arc::new(Catalog::builtin()),
        )
    }

    fn fill_profile(session: &mut WizardSession) {
        session.set_name("Maya").unwrap();
        session.set_age_group(AgeGroup::EightToTen).unwrap();
        session.set_interests(vec!["magic".to_string()]).unwrap();
        session.set_genres(vec!["fantasy".to_string()]).unwrap();
        session.set_language(Language::English).unwrap();
    }

    #[test]
    fn test_invalid_step_blocks_advance() {
        let mut session = new_session();

        // Name unset: next_step stays put.
        assert_eq!(session.next_step(), Step::Name);

        session.set_name("Maya").unwrap();
        assert_eq!(session.next_step(), Step::Age);
        assert!(session.is_step_completed(Step::Name));
    }

    #[test]
    fn test_full_walk_computes_recommendations() {
        let mut session = new_session();
        fill_profile(&mut session);

        let mut step = session.current_step();
        while step != Step::Results {
            let next = session.next_step();
            assert_ne!(next, step, "wizard stuck at {:?}", step);
            step = next;
        }

        assert!(!session.recommendations().is_empty());
        for rec in session.recommendations() {
            assert!(rec.score > 0);
        }
    }

    #[test]
    fn test_profile_freezes_after_results() {
        let mut session = new_session();
        fill_profile(&mut session);
        session.go_to_step(Step::Results);

        assert!(!session.recommendations().is_empty());
        assert!(session.set_name("Someone Else").is_err());
        assert!(session.set_genres(vec!["poetry".to_string()]).is_err());
    }

    #[test]
    fn test_profile_freezes_even_with_zero_matches() {
        // The only book is out of age range, so neither the primary path nor
        // the fallback returns anything; computing still locks the profile.
        let catalog = Catalog::new(vec![Book {
            id: "teens-only".to_string(),
            title: "Teens Only".to_string(),
            author: "An Author".to_string(),
            cover_url: "/covers/teens-only.jpg".to_string(),
            age_groups: vec![AgeGroup::FourteenToSeventeen],
            interests: vec!["adventure".to_string()],
            genres: vec!["science-fiction".to_string()],
            languages: vec![Language::French],
            page_count: 300,
            published_year: 2019,
            description: "Not for this reader.".to_string(),
        }]);
        let mut session =
            WizardSession::load(Arc::new(MemorySessionStore::new()), Arc::new(catalog));
        fill_profile(&mut session);

        session.go_to_step(Step::Results);

        assert!(session.recommendations().is_empty());
        assert!(session.set_name("Someone Else").is_err());

        session.reset();
        assert!(session.set_name("Noor").is_ok());
    }

    #[test]
    fn test_reset_unfreezes_and_clears() {
        let mut session = new_session();
        fill_profile(&mut session);
        session.go_to_step(Step::Results);

        session.reset();

        assert_eq!(session.current_step(), Step::Name);
        assert!(session.recommendations().is_empty());
        assert_eq!(session.draft(), &DraftProfile::default());
        assert!(session.set_name("Noor").is_ok());
    }

    #[test]
    fn test_state_survives_reload() {
        let store = Arc::new(MemorySessionStore::new());
        let catalog = Arc::new(Catalog::builtin());

        {
            let mut session = WizardSession::load(store.clone(), catalog.clone());
            session.set_name("Maya").unwrap();
            session.set_age_group(AgeGroup::EightToTen).unwrap();
            session.next_step();
        }

        let session = WizardSession::load(store, catalog);
        assert_eq!(session.draft().name, "Maya");
        assert_eq!(session.draft().age_group, Some(AgeGroup::EightToTen));
        assert!(session.is_step_completed(Step::Name));
    }

    #[test]
    fn test_corrupt_blob_loads_as_fresh_session() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(WIZARD_STORAGE_KEY, "{broken json").unwrap();

        let session = WizardSession::load(store, Arc::new(Catalog::builtin()));
        assert_eq!(session.draft(), &DraftProfile::default());
    }

    #[test]
    fn test_previous_step_walks_back() {
        let mut session = new_session();
        session.set_name("Maya").unwrap();
        session.next_step();

        assert_eq!(session.previous_step(), Step::Name);
        assert_eq!(session.previous_step(), Step::Name);
    }
}
