use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::section::SectionRecord;
use crate::resume::progress::{compute_progress, Progress};
use crate::resume::schema::SectionKind;
use crate::resume::store::SectionStore;

/// The whole résumé of one user, as served by `GET /resume/`.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSnapshot {
    pub personal_info: Option<SectionRecord>,
    pub experiences: Vec<SectionRecord>,
    pub education: Vec<SectionRecord>,
    pub projects: Vec<SectionRecord>,
    pub skills: Option<SectionRecord>,
    pub progress: Progress,
}

/// Reads every section for `owner` and derives progress.
///
/// Read-only: singletons that were never materialized come back as `None`.
/// A section that fails to load degrades to empty instead of failing the
/// snapshot.
pub async fn build_snapshot(store: &dyn SectionStore, owner: Uuid) -> ResumeSnapshot {
    let (personal_info, experiences, education, projects, skills) = tokio::join!(
        store.find_singleton(SectionKind::PersonalInfo, owner),
        store.list(SectionKind::Experience, owner),
        store.list(SectionKind::Education, owner),
        store.list(SectionKind::Project, owner),
        store.find_singleton(SectionKind::Skill, owner),
    );

    let personal_info = degrade(SectionKind::PersonalInfo, owner, personal_info);
    let experiences = degrade(SectionKind::Experience, owner, experiences);
    let education = degrade(SectionKind::Education, owner, education);
    let projects = degrade(SectionKind::Project, owner, projects);
    let skills = degrade(SectionKind::Skill, owner, skills);

    let progress = compute_progress(
        personal_info.as_ref(),
        &experiences,
        &education,
        &projects,
        skills.as_ref(),
    );

    ResumeSnapshot {
        personal_info,
        experiences,
        education,
        projects,
        skills,
        progress,
    }
}

fn degrade<T: Default>(kind: SectionKind, owner: Uuid, result: Result<T, sqlx::Error>) -> T {
    result.unwrap_or_else(|e| {
        warn!(
            "Failed to load {} for user {owner}, serving it empty: {e}",
            kind.table()
        );
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::memory::MemoryStore;
    use crate::resume::payload::SectionChanges;
    use async_trait::async_trait;

    /// Delegates to a memory store but fails every read of one section kind.
    struct FailingSection {
        inner: MemoryStore,
        broken: SectionKind,
    }

    impl FailingSection {
        fn check(&self, kind: SectionKind) -> Result<(), sqlx::Error> {
            if kind == self.broken {
                Err(sqlx::Error::PoolTimedOut)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SectionStore for FailingSection {
        async fn list(
            &self,
            kind: SectionKind,
            owner: Uuid,
        ) -> Result<Vec<SectionRecord>, sqlx::Error> {
            self.check(kind)?;
            self.inner.list(kind, owner).await
        }

        async fn get(
            &self,
            kind: SectionKind,
            owner: Uuid,
            id: i64,
        ) -> Result<Option<SectionRecord>, sqlx::Error> {
            self.check(kind)?;
            self.inner.get(kind, owner, id).await
        }

        async fn create(
            &self,
            kind: SectionKind,
            owner: Uuid,
            changes: &SectionChanges,
        ) -> Result<SectionRecord, sqlx::Error> {
            self.inner.create(kind, owner, changes).await
        }

        async fn update(
            &self,
            kind: SectionKind,
            owner: Uuid,
            id: i64,
            changes: &SectionChanges,
        ) -> Result<Option<SectionRecord>, sqlx::Error> {
            self.inner.update(kind, owner, id, changes).await
        }

        async fn delete(&self, kind: SectionKind, owner: Uuid, id: i64) -> Result<bool, sqlx::Error> {
            self.inner.delete(kind, owner, id).await
        }

        async fn find_singleton(
            &self,
            kind: SectionKind,
            owner: Uuid,
        ) -> Result<Option<SectionRecord>, sqlx::Error> {
            self.check(kind)?;
            self.inner.find_singleton(kind, owner).await
        }

        async fn get_or_create_singleton(
            &self,
            kind: SectionKind,
            owner: Uuid,
        ) -> Result<SectionRecord, sqlx::Error> {
            self.inner.get_or_create_singleton(kind, owner).await
        }
    }

    fn complete_experience() -> SectionChanges {
        SectionChanges::from_pairs(&[
            ("title", "Engineer"),
            ("company", "Acme"),
            ("location", "Berlin"),
            ("duration", "2021 - 2023"),
            ("description", "- Shipped things"),
        ])
    }

    #[tokio::test]
    async fn test_new_user_gets_empty_snapshot() {
        let store = MemoryStore::new();
        let snapshot = build_snapshot(&store, Uuid::new_v4()).await;

        assert!(snapshot.personal_info.is_none());
        assert!(snapshot.experiences.is_empty());
        assert!(snapshot.education.is_empty());
        assert!(snapshot.projects.is_empty());
        assert!(snapshot.skills.is_none());
        assert_eq!(snapshot.progress, Progress::default());
    }

    #[tokio::test]
    async fn test_snapshot_does_not_materialize_singletons() {
        let store = MemoryStore::new();
        build_snapshot(&store, Uuid::new_v4()).await;

        assert_eq!(store.count(SectionKind::PersonalInfo).await, 0);
        assert_eq!(store.count(SectionKind::Skill).await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (store.add_user("alice").await, store.add_user("bob").await);
        store
            .create(SectionKind::Experience, alice, &complete_experience())
            .await
            .unwrap();

        let theirs = build_snapshot(&store, bob).await;
        assert!(theirs.experiences.is_empty());
        assert_eq!(theirs.progress.experience, 0);

        let mine = build_snapshot(&store, alice).await;
        assert_eq!(mine.experiences.len(), 1);
        assert_eq!(mine.progress.experience, 100);
    }

    #[tokio::test]
    async fn test_failing_section_degrades_to_empty() {
        let store = FailingSection {
            inner: MemoryStore::new(),
            broken: SectionKind::Education,
        };
        let owner = store.inner.add_user("owner").await;
        store
            .create(SectionKind::Experience, owner, &complete_experience())
            .await
            .unwrap();
        store
            .create(
                SectionKind::Education,
                owner,
                &SectionChanges::from_pairs(&[("degree", "BSc")]),
            )
            .await
            .unwrap();

        let snapshot = build_snapshot(&store, owner).await;
        assert!(snapshot.education.is_empty());
        assert_eq!(snapshot.progress.education, 0);
        assert_eq!(snapshot.experiences.len(), 1);
        assert_eq!(snapshot.progress.experience, 100);
    }

    #[tokio::test]
    async fn test_failing_singleton_degrades_to_null() {
        let store = FailingSection {
            inner: MemoryStore::new(),
            broken: SectionKind::Skill,
        };
        let owner = store.inner.add_user("owner").await;
        store
            .get_or_create_singleton(SectionKind::Skill, owner)
            .await
            .unwrap();

        let snapshot = build_snapshot(&store, owner).await;
        assert!(snapshot.skills.is_none());
    }
}
