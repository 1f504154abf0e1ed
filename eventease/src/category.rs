//! Category slice: the category list and admin create/delete.

use crate::collection::{self, Placement};
use crate::environment::EventEaseEnvironment;
use crate::status::{RequestSeq, RequestStatus};
use eventease_client::{Category, NewCategory};
use eventease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Fallback when the category list cannot be loaded
pub const FETCH_FAILED: &str = "Failed to fetch categories";
/// Fallback when category creation fails
pub const CREATE_FAILED: &str = "Category creation failed";
/// Fallback when category deletion fails
pub const DELETE_FAILED: &str = "Category deletion failed";

/// Category slice state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryState {
    /// Known categories, unique by id
    pub categories: Vec<Category>,
    /// Last operation status
    pub status: RequestStatus,
    /// Last error message
    pub error: Option<String>,
    /// Fence for list fetches
    pub seq: RequestSeq,
}

impl CategoryState {
    /// Look up a category by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}

/// Category slice actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryAction {
    // Commands
    /// Load every category
    FetchCategories,
    /// Create a category (admin)
    CreateCategory(NewCategory),
    /// Delete a category (admin)
    DeleteCategory {
        /// Category id
        id: String,
    },
    /// Back to the initial state
    ResetCategories,
    /// Drop the last error message
    ClearError,

    // Results
    /// Category list loaded
    CategoriesLoaded {
        /// Request sequence number
        seq: u64,
        /// The full list
        categories: Vec<Category>,
    },
    /// Category list failed to load
    CategoriesFailed {
        /// Request sequence number
        seq: u64,
        /// User-facing message
        error: String,
    },
    /// Category created
    CategoryCreated(Category),
    /// Category creation failed
    CreateCategoryFailed {
        /// User-facing message
        error: String,
    },
    /// Category deleted
    CategoryDeleted {
        /// Category id
        id: String,
    },
    /// Category deletion failed
    DeleteCategoryFailed {
        /// User-facing message
        error: String,
    },
}

/// Reducer for the category slice
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryReducer;

impl CategoryReducer {
    /// Creates a new `CategoryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin(state: &mut CategoryState) {
        state.status = RequestStatus::Loading;
        state.error = None;
    }

    fn fail(state: &mut CategoryState, error: String) {
        state.status = RequestStatus::Failed;
        state.error = Some(error);
    }
}

impl Reducer for CategoryReducer {
    type State = CategoryState;
    type Action = CategoryAction;
    type Environment = EventEaseEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CategoryAction::FetchCategories => {
                Self::begin(state);
                let seq = state.seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.list_categories().await {
                        Ok(categories) => Some(CategoryAction::CategoriesLoaded { seq, categories }),
                        Err(error) => Some(CategoryAction::CategoriesFailed {
                            seq,
                            error: error.user_message(FETCH_FAILED),
                        }),
                    }
                })]
            },

            CategoryAction::CreateCategory(category) => {
                if let Err(error) = category.validate() {
                    Self::fail(state, error.to_string());
                    return smallvec![Effect::None];
                }
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.create_category(category).await {
                        Ok(created) => Some(CategoryAction::CategoryCreated(created)),
                        Err(error) => Some(CategoryAction::CreateCategoryFailed {
                            error: error.user_message(CREATE_FAILED),
                        }),
                    }
                })]
            },

            CategoryAction::DeleteCategory { id } => {
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.delete_category(id.clone()).await {
                        Ok(()) => Some(CategoryAction::CategoryDeleted { id }),
                        Err(error) => Some(CategoryAction::DeleteCategoryFailed {
                            error: error.user_message(DELETE_FAILED),
                        }),
                    }
                })]
            },

            CategoryAction::ResetCategories => {
                let mut seq = state.seq;
                seq.issue();
                *state = CategoryState {
                    seq,
                    ..CategoryState::default()
                };
                smallvec![Effect::None]
            },

            CategoryAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            // ========== Results ==========
            CategoryAction::CategoriesLoaded { seq, categories } => {
                if state.seq.accepts(seq, "category") {
                    state.categories = collection::dedup_by_key(categories, |c| c.id.as_str());
                    state.status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            CategoryAction::CategoriesFailed { seq, error } => {
                if state.seq.accepts(seq, "category") {
                    Self::fail(state, error);
                }
                smallvec![Effect::None]
            },

            CategoryAction::CategoryCreated(category) => {
                tracing::info!(id = %category.id, name = %category.name, "Category created");
                collection::upsert(&mut state.categories, category, Placement::Back, |c| {
                    c.id.as_str()
                });
                state.status = RequestStatus::Succeeded;
                state.error = None;
                smallvec![Effect::None]
            },

            CategoryAction::CategoryDeleted { id } => {
                state.categories.retain(|category| category.id != id);
                state.status = RequestStatus::Succeeded;
                smallvec![Effect::None]
            },

            CategoryAction::CreateCategoryFailed { error }
            | CategoryAction::DeleteCategoryFailed { error } => {
                Self::fail(state, error);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::fixtures::{category, environment, image};
    use eventease_client::mock::{ApiCall, Reply};
    use eventease_client::{ApiError, MockApi, Route};
    use eventease_testing::{assertions, resolve_effects, ReducerTest};

    async fn run(
        state: &mut CategoryState,
        action: CategoryAction,
        env: &EventEaseEnvironment,
    ) -> Vec<RequestStatus> {
        let mut seen = Vec::new();
        let effects = CategoryReducer.reduce(state, action, env);
        seen.push(state.status);
        for result in resolve_effects(effects).await {
            CategoryReducer.reduce(state, result, env);
            seen.push(state.status);
        }
        seen
    }

    #[tokio::test]
    async fn fetch_replaces_collection() {
        let api = MockApi::new();
        api.push(
            Route::ListCategories,
            Reply::Categories(vec![category("cat1", "Music"), category("cat2", "Tech")]),
        );
        let env = environment(api);
        let mut state = CategoryState {
            categories: vec![category("old", "Old")],
            ..CategoryState::default()
        };

        let statuses = run(&mut state, CategoryAction::FetchCategories, &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Succeeded]);
        let ids: Vec<_> = state.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cat1", "cat2"]);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_collection() {
        let api = MockApi::new();
        api.push(
            Route::ListCategories,
            Reply::Failure(ApiError::Request("offline".to_string())),
        );
        let env = environment(api);
        let mut state = CategoryState {
            categories: vec![category("cat1", "Music")],
            ..CategoryState::default()
        };

        let statuses = run(&mut state, CategoryAction::FetchCategories, &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Failed]);
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(state.categories.len(), 1);
    }

    #[tokio::test]
    async fn create_appends_once_and_clears_error() {
        let api = MockApi::new();
        api.push(Route::CreateCategory, Reply::Category(category("cat9", "Tech")));
        let env = environment(api.clone());
        let mut state = CategoryState {
            categories: vec![category("cat1", "Music")],
            error: Some("previous failure".to_string()),
            ..CategoryState::default()
        };

        let form = NewCategory {
            name: "Tech".to_string(),
            image: Some(image()),
        };
        let statuses = run(&mut state, CategoryAction::CreateCategory(form.clone()), &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Succeeded]);
        assert_eq!(state.categories.len(), 2);
        assert_eq!(state.categories.iter().filter(|c| c.id == "cat9").count(), 1);
        assert_eq!(state.error, None);
        assert_eq!(api.calls(), vec![ApiCall::CreateCategory(form)]);
    }

    #[test]
    fn created_category_with_known_id_is_not_duplicated() {
        ReducerTest::new(CategoryReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(CategoryState {
                categories: vec![category("cat1", "Music")],
                ..CategoryState::default()
            })
            .when_action(CategoryAction::CategoryCreated(category("cat1", "Live Music")))
            .then_state(|state| {
                assert_eq!(state.categories.len(), 1);
                assert_eq!(state.categories[0].name, "Live Music");
            })
            .run();
    }

    #[test]
    fn invalid_form_is_rejected_without_request() {
        ReducerTest::new(CategoryReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(CategoryState::default())
            .when_action(CategoryAction::CreateCategory(NewCategory {
                name: "Tech".to_string(),
                image: None,
            }))
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Failed);
                assert_eq!(state.error.as_deref(), Some("Thumbnail image is required"));
            })
            .then_effects(assertions::assert_no_request)
            .run();
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let api = MockApi::new();
        api.push(Route::DeleteCategory, Reply::Unit);
        let env = environment(api);
        let mut state = CategoryState {
            categories: vec![category("cat1", "Music"), category("cat2", "Tech")],
            ..CategoryState::default()
        };

        let statuses = run(
            &mut state,
            CategoryAction::DeleteCategory {
                id: "cat1".to_string(),
            },
            &env,
        )
        .await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Succeeded]);
        assert_eq!(state.categories.len(), 1);
        assert!(state.get("cat1").is_none());
    }

    #[tokio::test]
    async fn delete_failure_surfaces_server_message() {
        let api = MockApi::new();
        api.push(
            Route::DeleteCategory,
            Reply::Failure(ApiError::Server {
                status: 409,
                message: Some("Category has events".to_string()),
            }),
        );
        let env = environment(api);
        let mut state = CategoryState {
            categories: vec![category("cat1", "Music")],
            ..CategoryState::default()
        };

        run(
            &mut state,
            CategoryAction::DeleteCategory {
                id: "cat1".to_string(),
            },
            &env,
        )
        .await;

        assert_eq!(state.error.as_deref(), Some("Category has events"));
        assert_eq!(state.categories.len(), 1);
    }

    #[test]
    fn reset_discards_in_flight_fetch() {
        let env = environment(MockApi::new());
        let mut state = CategoryState::default();
        let seq = state.seq.issue();
        state.categories.push(category("cat1", "Music"));

        CategoryReducer.reduce(&mut state, CategoryAction::ResetCategories, &env);
        assert!(state.categories.is_empty());
        assert_eq!(state.status, RequestStatus::Idle);

        CategoryReducer.reduce(
            &mut state,
            CategoryAction::CategoriesLoaded {
                seq,
                categories: vec![category("cat2", "Tech")],
            },
            &env,
        );
        assert!(state.categories.is_empty());
    }
}
