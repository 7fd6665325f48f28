//! Saga-style step execution.
//!
//! A multi-step flow declares each forward action next to the action that
//! undoes it; the driver unwinds completed steps in reverse order when a
//! later step fails, then re-raises the original error. Compensation is
//! best-effort: a failing compensation is logged and unwinding continues, so
//! the caller always sees the error that started the rollback.

use async_trait::async_trait;
use payout_env::logger;

use crate::{
    core::{errors::RouterResult, payouts},
    routes::AppState,
    types::api,
};

#[async_trait]
pub trait WorkflowStep<Ctx>: Send + Sync
where
    Ctx: Send,
{
    /// Step name used in rollback logs.
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &mut Ctx) -> RouterResult<()>;

    /// Undo the effects of a completed `execute`. Default: nothing to undo.
    async fn compensate(&self, _ctx: &mut Ctx) -> RouterResult<()> {
        Ok(())
    }
}

/// Run `steps` in order. On failure, compensate every previously completed
/// step in reverse order and return the original error.
pub async fn run_steps<Ctx>(
    ctx: &mut Ctx,
    steps: &[Box<dyn WorkflowStep<Ctx>>],
) -> RouterResult<()>
where
    Ctx: Send,
{
    let mut completed: Vec<&dyn WorkflowStep<Ctx>> = Vec::with_capacity(steps.len());
    for step in steps {
        match step.execute(ctx).await {
            Ok(()) => completed.push(step.as_ref()),
            Err(err) => {
                for done in completed.iter().rev() {
                    if let Err(compensation_err) = done.compensate(ctx).await {
                        logger::error!(
                            step = done.name(),
                            error = ?compensation_err,
                            "compensation failed while unwinding"
                        );
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

/// Outcome of the order-level payout step: a failed provider payout is a
/// reportable condition, not a crashed step, so the surrounding order
/// workflow can proceed and record the miss.
#[derive(Debug)]
pub struct CreatePayoutStepResult {
    pub payout: Option<api::PayoutResponse>,
    pub failed: bool,
}

/// Create a payout, folding every failure into the `{payout, failed}` result
/// instead of letting it cross the step boundary.
pub async fn create_payout_step(
    state: &AppState,
    req: api::CreatePayoutRequest,
) -> CreatePayoutStepResult {
    match payouts::create_payout(state, req).await {
        Ok(payout) => CreatePayoutStepResult {
            payout: Some(payout),
            failed: false,
        },
        Err(err) => {
            logger::warn!(error = ?err, "payout creation failed; reporting without aborting the workflow");
            CreatePayoutStepResult {
                payout: None,
                failed: true,
            }
        }
    }
}

#[cfg(test)]
mod workflow_tests {
    use error_stack::report;

    use super::*;
    use crate::core::errors::ApiErrorResponse;

    #[derive(Default)]
    struct TraceContext {
        log: Vec<&'static str>,
    }

    struct Recorded {
        name: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl WorkflowStep<TraceContext> for Recorded {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self, ctx: &mut TraceContext) -> crate::core::errors::RouterResult<()> {
            if self.fail {
                return Err(report!(ApiErrorResponse::InternalServerError));
            }
            ctx.log.push(self.name);
            Ok(())
        }

        async fn compensate(
            &self,
            ctx: &mut TraceContext,
        ) -> crate::core::errors::RouterResult<()> {
            ctx.log.push("undo");
            ctx.log.push(self.name);
            Ok(())
        }
    }

    fn step(name: &'static str, fail: bool) -> Box<dyn WorkflowStep<TraceContext>> {
        Box::new(Recorded { name, fail })
    }

    #[tokio::test]
    async fn all_steps_run_in_order_when_nothing_fails() {
        let mut ctx = TraceContext::default();
        run_steps(&mut ctx, &[step("a", false), step("b", false)])
            .await
            .unwrap();
        assert_eq!(ctx.log, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failure_unwinds_completed_steps_in_reverse_order() {
        let mut ctx = TraceContext::default();
        let err = run_steps(
            &mut ctx,
            &[step("a", false), step("b", false), step("c", true)],
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            ApiErrorResponse::InternalServerError
        ));
        assert_eq!(ctx.log, vec!["a", "b", "undo", "b", "undo", "a"]);
    }

    #[tokio::test]
    async fn the_failing_step_itself_is_not_compensated() {
        let mut ctx = TraceContext::default();
        run_steps(&mut ctx, &[step("only", true)]).await.unwrap_err();
        assert!(ctx.log.is_empty());
    }
}
