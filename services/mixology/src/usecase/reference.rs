use crate::domain::repository::{LanguageRepository, ReferenceRepository};
use crate::domain::types::{Language, Reference, ReferenceKind};
use crate::error::MixologyError;

// ── ListReferences ───────────────────────────────────────────────────────────

pub struct ListReferencesUseCase<R: ReferenceRepository> {
    pub references: R,
}

impl<R: ReferenceRepository> ListReferencesUseCase<R> {
    pub async fn execute(&self, kind: ReferenceKind) -> Result<Vec<Reference>, MixologyError> {
        self.references.list(kind).await
    }
}

// ── ListLanguages ────────────────────────────────────────────────────────────

pub struct ListLanguagesUseCase<L: LanguageRepository> {
    pub languages: L,
}

impl<L: LanguageRepository> ListLanguagesUseCase<L> {
    pub async fn execute(&self) -> Result<Vec<Language>, MixologyError> {
        self.languages.list().await
    }
}
