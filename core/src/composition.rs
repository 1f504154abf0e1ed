//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a child reducer on one field of a parent state
//!   and one variant of a parent action
//!
//! The EventEase store is built from both: each slice reducer is scoped to its
//! field of `AppState` and its variant of `AppAction`, then the scoped reducers
//! are combined into one.
//!
//! # Examples
//!
//! ```
//! use eventease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use eventease_core::composition::{combine_reducers, scope_reducer, SharedReducer};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! #[derive(Clone)]
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     left: CounterState,
//!     right: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! fn left(s: &mut AppState) -> &mut CounterState { &mut s.left }
//! fn right(s: &mut AppState) -> &mut CounterState { &mut s.right }
//! fn only_left(a: AppAction) -> Option<CounterAction> {
//!     match a { AppAction::Left(a) => Some(a), AppAction::Right(_) => None }
//! }
//! fn only_right(a: AppAction) -> Option<CounterAction> {
//!     match a { AppAction::Right(a) => Some(a), AppAction::Left(_) => None }
//! }
//!
//! let app = combine_reducers::<AppState, AppAction, ()>(vec![
//!     Arc::new(scope_reducer(CounterReducer, left, only_left, AppAction::Left)) as SharedReducer<_, _, _>,
//!     Arc::new(scope_reducer(CounterReducer, right, only_right, AppAction::Right)) as SharedReducer<_, _, _>,
//! ]);
//!
//! let mut state = AppState::default();
//! app.reduce(&mut state, AppAction::Right(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 0);
//! assert_eq!(state.right.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared, thread-safe reducer trait object
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in order, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer to one field of a parent state and one variant of a
/// parent action.
///
/// - `state`: borrows the child state out of the parent state
/// - `extract`: returns the child action if the parent action targets this child
/// - `embed`: lifts the child's result actions back into the parent action type
///
/// Parent actions that `extract` rejects produce no effects and leave the child
/// state untouched.
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state and actions.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R> {
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R: Clone> Clone for ScopedReducer<S, SubS, A, SubA, E, R> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: Send + 'static,
    SubA: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let embed = self.embed;

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // Test code
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct NameState {
        name: String,
    }

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        profile: NameState,
    }

    #[derive(Clone, Debug)]
    enum NameAction {
        SetName(String),
        NameSaved,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Profile(NameAction),
    }

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if matches!(action, TestAction::Increment) {
                state.counter += 1;
            }
            SmallVec::new()
        }
    }

    #[derive(Clone)]
    struct NameReducer;

    impl Reducer for NameReducer {
        type State = NameState;
        type Action = NameAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                NameAction::SetName(name) => {
                    state.name = name;
                    smallvec![Effect::send(NameAction::NameSaved)]
                },
                NameAction::NameSaved => SmallVec::new(),
            }
        }
    }

    fn profile_state(state: &mut TestState) -> &mut NameState {
        &mut state.profile
    }

    fn profile_action(action: TestAction) -> Option<NameAction> {
        match action {
            TestAction::Profile(action) => Some(action),
            TestAction::Increment => None,
        }
    }

    fn profile_reducer() -> ScopedReducer<TestState, NameState, TestAction, NameAction, (), NameReducer> {
        scope_reducer(NameReducer, profile_state, profile_action, TestAction::Profile)
    }

    #[test]
    fn scoped_reducer_ignores_other_actions() {
        let scoped = profile_reducer();
        let mut state = TestState::default();

        let effects = scoped.reduce(&mut state, TestAction::Increment, &());

        assert!(effects.is_empty());
        assert!(state.profile.name.is_empty());
    }

    #[tokio::test]
    async fn scoped_reducer_lifts_effects() {
        let scoped = profile_reducer();
        let mut state = TestState::default();

        let mut effects = scoped.reduce(
            &mut state,
            TestAction::Profile(NameAction::SetName("Ada".to_string())),
            &(),
        );

        assert_eq!(state.profile.name, "Ada");
        assert_eq!(effects.len(), 1);
        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected Effect::Future");
        };
        assert!(matches!(
            fut.await,
            Some(TestAction::Profile(NameAction::NameSaved))
        ));
    }

    #[test]
    fn combined_reducer_runs_all() {
        let combined = combine_reducers(vec![
            Arc::new(CounterReducer) as SharedReducer<TestState, TestAction, ()>,
            Arc::new(profile_reducer()) as SharedReducer<TestState, TestAction, ()>,
        ]);
        assert_eq!(combined.len(), 2);

        let mut state = TestState::default();
        combined.reduce(&mut state, TestAction::Increment, &());
        let effects = combined.reduce(
            &mut state,
            TestAction::Profile(NameAction::SetName("Grace".to_string())),
            &(),
        );

        assert_eq!(state.counter, 1);
        assert_eq!(state.profile.name, "Grace");
        assert_eq!(effects.len(), 1);
    }
}
