use std::sync::atomic::{AtomicBool, Ordering};

use recipes::{Dietary, Health, RecipeRequest, RecipeResponse, RenderOptions};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{client::RecipeClient, error::FormError, utils::coerce_target};

/// Everything the preference form knows: the inputs, whether a submission is
/// pending and the last thing shown to the user.
///
/// While a submission is pending every setter and [`Form::submit`] answer
/// [`FormError::Busy`], so at most one request is ever in flight per form.
pub struct Form {
    fields: Mutex<RecipeRequest>,
    loading: AtomicBool,
    result: Mutex<Option<RecipeResponse>>,
    options: RenderOptions,
}

/// Clears the loading flag however the submission ends, dropped futures included.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, FormError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FormError::Busy)?;

        Ok(Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Form {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            fields: Mutex::new(RecipeRequest::default()),
            loading: AtomicBool::new(false),
            result: Mutex::new(None),
            options,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn fields(&self) -> RecipeRequest {
        self.fields.lock().await.clone()
    }

    pub async fn result(&self) -> Option<RecipeResponse> {
        self.result.lock().await.clone()
    }

    /// Replaces every input at once.
    pub async fn fill(&self, fields: RecipeRequest) -> Result<(), FormError> {
        self.edit(|current| {
            *current = RecipeRequest {
                calories: coerce_target(fields.calories),
                protein: coerce_target(fields.protein),
                fat: coerce_target(fields.fat),
                ..fields
            };
        })
        .await
    }

    pub async fn set_query(&self, query: impl Into<String>) -> Result<(), FormError> {
        let query = query.into();
        self.edit(|fields| fields.query = query).await
    }

    pub async fn set_dietary(&self, dietary: Dietary) -> Result<(), FormError> {
        self.edit(|fields| fields.dietary = dietary).await
    }

    pub async fn set_health(&self, health: Health) -> Result<(), FormError> {
        self.edit(|fields| fields.health = health).await
    }

    pub async fn set_allergens(&self, allergens: impl Into<String>) -> Result<(), FormError> {
        let allergens = allergens.into();
        self.edit(|fields| fields.allergens = allergens).await
    }

    pub async fn set_calories(&self, calories: f64) -> Result<(), FormError> {
        self.edit(|fields| fields.calories = coerce_target(calories)).await
    }

    pub async fn set_protein(&self, protein: f64) -> Result<(), FormError> {
        self.edit(|fields| fields.protein = coerce_target(protein)).await
    }

    pub async fn set_fat(&self, fat: f64) -> Result<(), FormError> {
        self.edit(|fields| fields.fat = coerce_target(fat)).await
    }

    async fn edit<F>(&self, change: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut RecipeRequest),
    {
        let mut fields = self.fields.lock().await;
        if self.is_loading() {
            return Err(FormError::Busy);
        }

        change(&mut *fields);
        Ok(())
    }

    /// Sends the current inputs and stores what should be displayed.
    ///
    /// Transport failures are not returned: they are logged and the stored
    /// result becomes [`RecipeResponse::fallback`]. The only error is
    /// [`FormError::Busy`].
    pub async fn submit<C>(&self, client: &C) -> Result<RecipeResponse, FormError>
    where
        C: RecipeClient + ?Sized,
    {
        let _loading = LoadingGuard::acquire(&self.loading)?;
        let request = self.fields().await;

        info!("Requesting recommendation for {:?}", request.query);

        let response = match client.fetch_recipe(&request).await {
            Ok(response) => response.formatted(&self.options),
            Err(e) => {
                error!("Error fetching recipe: {e}");
                RecipeResponse::fallback()
            }
        };

        *self.result.lock().await = Some(response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use recipes::{Latency, models::FALLBACK_RECOMMENDATION};
    use tokio::sync::Notify;

    use super::*;

    /// Answers every request with the same response, or fails when it has none.
    #[derive(Default)]
    struct FakeClient {
        answer: Option<RecipeResponse>,
        requests: StdMutex<Vec<RecipeRequest>>,
        gate: Option<Notify>,
    }

    impl FakeClient {
        fn answering(recommendation: &str, latency: f64) -> Self {
            Self {
                answer: Some(RecipeResponse {
                    recommendation: Some(recommendation.to_string()),
                    latency: Latency::Seconds(latency),
                    ..Default::default()
                }),
                ..Default::default()
            }
        }

        fn requests(&self) -> Vec<RecipeRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecipeClient for FakeClient {
        async fn fetch_recipe(
            &self,
            request: &RecipeRequest,
        ) -> Result<RecipeResponse, FormError> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            self.answer.clone().ok_or(FormError::Status(500))
        }
    }

    #[tokio::test]
    async fn test_success_is_rendered_and_stored() {
        let form = Form::default();
        let client = FakeClient::answering("**Dal**\n* lentils", 1.2);

        let response = form.submit(&client).await.unwrap();

        assert_eq!(
            response.recommendation.as_deref(),
            Some(concat!(
                "<strong>Dal</strong>\n",
                r#"<ul class="recipe-list"><li class="recipe-bullet">lentils</li></ul>"#
            ))
        );
        assert_eq!(response.latency, Latency::Seconds(1.2));
        assert_eq!(form.result().await, Some(response));
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_failure_stores_fallback() {
        let form = Form::default();
        let client = FakeClient::default();

        let response = form.submit(&client).await.unwrap();

        assert_eq!(response.recommendation.as_deref(), Some(FALLBACK_RECOMMENDATION));
        assert_eq!(response.latency.to_string(), "-");
        assert_eq!(form.result().await, Some(RecipeResponse::fallback()));
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_request_is_built_from_current_fields() {
        let form = Form::default();
        let client = FakeClient::answering("ok", 0.4);

        form.set_query("vegan curry").await.unwrap();
        form.set_dietary(Dietary::Vegan).await.unwrap();
        form.set_health(Health::Diabetes).await.unwrap();
        form.set_allergens("nuts, dairy").await.unwrap();
        form.set_calories(600.0).await.unwrap();
        form.set_protein(20.0).await.unwrap();
        form.set_fat(-3.0).await.unwrap();
        form.submit(&client).await.unwrap();

        form.set_query("lentil soup").await.unwrap();
        form.submit(&client).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0],
            RecipeRequest {
                query: "vegan curry".to_string(),
                dietary: Dietary::Vegan,
                health: Health::Diabetes,
                allergens: "nuts, dairy".to_string(),
                calories: 600.0,
                protein: 20.0,
                fat: 0.0,
            }
        );
        assert_eq!(requests[1].query, "lentil soup");
        assert_eq!(requests[1].dietary, Dietary::Vegan);
    }

    #[tokio::test]
    async fn test_identical_submissions_are_independent() {
        let form = Form::default();
        let client = FakeClient::answering("ok", 0.4);
        form.set_query("soup").await.unwrap();

        form.submit(&client).await.unwrap();
        form.submit(&client).await.unwrap();

        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_inputs_and_submit_disabled_while_loading() {
        let form = Form::default();
        let client = FakeClient {
            gate: Some(Notify::new()),
            ..FakeClient::answering("done", 2.0)
        };

        let (first, ()) = tokio::join!(form.submit(&client), async {
            while !form.is_loading() {
                tokio::task::yield_now().await;
            }

            assert!(matches!(form.submit(&client).await, Err(FormError::Busy)));
            assert!(matches!(form.set_query("other").await, Err(FormError::Busy)));
            assert!(matches!(form.set_fat(1.0).await, Err(FormError::Busy)));
            assert!(matches!(
                form.fill(RecipeRequest::default()).await,
                Err(FormError::Busy)
            ));

            if let Some(gate) = &client.gate {
                gate.notify_one();
            }
        });

        assert_eq!(first.unwrap().recommendation.as_deref(), Some("done"));
        assert!(!form.is_loading());
        assert_eq!(client.requests().len(), 1);
        form.set_query("other").await.unwrap();
    }

    #[tokio::test]
    async fn test_fill_clamps_targets() {
        let form = Form::default();

        form.fill(RecipeRequest {
            query: "salad".to_string(),
            calories: -100.0,
            protein: f64::NAN,
            fat: 12.0,
            ..Default::default()
        })
        .await
        .unwrap();

        let fields = form.fields().await;
        assert_eq!(fields.query, "salad");
        assert_eq!(fields.calories, 0.0);
        assert_eq!(fields.protein, 0.0);
        assert_eq!(fields.fat, 12.0);
    }

    #[tokio::test]
    async fn test_escape_option_applies_to_result() {
        let form = Form::new(RenderOptions { escape_html: true });
        let client = FakeClient::answering("<img> *hot*", 0.1);

        let response = form.submit(&client).await.unwrap();

        assert_eq!(
            response.recommendation.as_deref(),
            Some("&lt;img&gt; <em>hot</em>")
        );
    }
}
