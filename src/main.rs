mod telemetry;

use telemetry::{get_subscriber, init_subscriber};
use vita_crm_api::Application;
use vita_crm_infra::setup_context;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("vita_crm_server".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
