// Walk the permission tree of a running backend and print what the
// RBAC screen would show.
//
// Usage: MARQUEE_URL=http://localhost:8080 MARQUEE_TOKEN=... \
//        cargo run --example permission_audit

use marquee_client::api::{AdminApi, RestAdminApi};
use marquee_client::rbac::RoleEditor;
use marquee_client::ClientConfig;
use shared::rbac::{MenuCatalog, MenuEntry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let base_url =
        std::env::var("MARQUEE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let mut config = ClientConfig::new(base_url);
    if let Ok(token) = std::env::var("MARQUEE_TOKEN") {
        config = config.with_token(token);
    }

    let catalog = MenuCatalog::new(vec![
        MenuEntry::new("/dashboard", "Dashboard"),
        MenuEntry::new("/hr/employees", "Employee List"),
        MenuEntry::new("/hr/departments", "Departments"),
        MenuEntry::new("/projects/kickoff", "Project Kickoff"),
        MenuEntry::new("/projects/pipeline", "Sales Pipeline"),
        MenuEntry::new("/meetings/minutes", "Meeting Minutes"),
        MenuEntry::new("/admin/rbac", "Access Control"),
    ])?;

    let api = RestAdminApi::new(config.build_http_client());
    let mut editor = RoleEditor::new(catalog);
    editor.load(&api).await?;

    println!("roles:");
    for role in editor.roles() {
        println!(
            "  [{}] {} ({}){}",
            role.id,
            role.role_name,
            role.role_code,
            if role.applying_to_all { " *all*" } else { "" }
        );
    }

    println!("pages:");
    for page in &editor.tree().pages {
        let marker = if page.is_virtual { "virtual" } else { "real" };
        println!("  {} ({}, {} children)", page.id, marker, page.children.len());
        for child in &page.children {
            println!("    - {} {:?}", child.id, child.kind);
        }
    }

    if !editor.tree().orphans.is_empty() {
        println!("orphans:");
        for orphan in &editor.tree().orphans {
            println!("  {} ({})", orphan.name, orphan.code);
        }
    }

    let roles = api.list_roles().await?;
    if let Some(first) = roles.first() {
        let employees = api.list_role_employees(first.id).await?;
        println!(
            "role {} has {} explicitly assigned employees",
            first.role_name,
            employees.len()
        );
    }

    Ok(())
}
