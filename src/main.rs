use preference_center::app::{load_configuration, setup_tracing, PreferenceCenterApp};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing("preference-center".into(), "info".into());
    let configuration = load_configuration()?;
    let app = PreferenceCenterApp::from(configuration).await?;
    app.server?.await?;
    Ok(())
}
