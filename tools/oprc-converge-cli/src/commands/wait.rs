use oprc_converge::ResourceId;

use super::Converge;
use crate::output::{condition_report, print_output};
use crate::types::WaitOperation;

pub async fn handle_wait_command(
    cv: &Converge,
    op: &WaitOperation,
) -> anyhow::Result<()> {
    let id = ResourceId::new(&op.kind, &cv.config().namespace, &op.name);
    let cond = cv.await_condition(&id).await?;
    print_output(&condition_report(&id, &cond), cv.output())
}
