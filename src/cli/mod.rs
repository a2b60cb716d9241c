//! Command-line interface for the CEPE workflow tracker.
//!
//! Subcommands:
//! - `login` / `logout` / `whoami` - session lifecycle
//! - `resumo` - summary counters and the most recent work orders
//! - `quadro` - the Kanban board, one column per pipeline stage
//! - `os list` / `os create` - work orders (creation gated by role)
//! - `admin users ...` / `admin os ...` - admin panel (level 3 only)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::app::{available_admin_tabs, available_tabs, can_access_admin, can_create_os};
use crate::client::ApiClient;
use crate::models::{
    Cargo, CreateOrdemRequest, CreateUserRequest, OrdemServico, ResumoOrdens, TipoOs, User,
};
use crate::session::Session;
use crate::AppState;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "cepe")]
#[command(author, version, about = "Terminal client for the CEPE print-shop workflow tracker", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cepe.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Backend URL to connect to (default: http://localhost:5000)
    #[arg(long, env = "CEPE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        senha: Option<String>,
    },

    /// Clear the persisted session
    Logout,

    /// Show the logged-in user and what the session can access
    Whoami,

    /// Summary: totals and the most recent work orders
    Resumo,

    /// Kanban board grouped by pipeline stage
    Quadro,

    /// Work order commands
    #[command(subcommand)]
    Os(OsCommands),

    /// Admin panel commands (requires nível de acesso 3)
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand, Debug)]
pub enum OsCommands {
    /// List all work orders
    List,
    /// Create a work order
    Create {
        #[arg(long)]
        numero_os: String,
        /// "Externa" or "Interna"
        #[arg(long, default_value = "Externa")]
        tipo_os: String,
        #[arg(long)]
        descricao: Option<String>,
        #[arg(long)]
        details: Option<String>,
        #[arg(long)]
        workaround: Option<String>,
        #[arg(long)]
        data_source: Option<String>,
        #[arg(long)]
        url_imagem_capa: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// User management
    #[command(subcommand)]
    Users(UserCommands),
    /// Work-order management
    #[command(subcommand)]
    Os(AdminOsCommands),
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List all users
    List,
    /// Create a user
    Create {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        senha: String,
        /// One of the fixed role labels, e.g. "Comercial"
        #[arg(long)]
        cargo: String,
        /// 1 (básico), 2 (supervisor) or 3 (administrador)
        #[arg(long, default_value_t = 1)]
        nivel_acesso: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminOsCommands {
    /// List all work orders
    List,
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, state: &mut AppState) -> Result<()> {
    match &cli.command {
        Commands::Login { email, senha } => cmd_login(state, email, senha.as_deref()).await,
        Commands::Logout => cmd_logout(state),
        Commands::Whoami => cmd_whoami(state),
        Commands::Resumo => cmd_resumo(state).await,
        Commands::Quadro => cmd_quadro(state).await,
        Commands::Os(OsCommands::List) => cmd_os_list(state).await,
        Commands::Os(OsCommands::Create {
            numero_os,
            tipo_os,
            descricao,
            details,
            workaround,
            data_source,
            url_imagem_capa,
        }) => {
            let request = CreateOrdemRequest {
                numero_os: numero_os.clone(),
                tipo_os: parse_tipo_os(tipo_os)?,
                descricao: descricao.clone(),
                details: details.clone(),
                workaround: workaround.clone(),
                data_source: data_source.clone(),
                url_imagem_capa: url_imagem_capa.clone(),
            };
            cmd_os_create(state, request).await
        }
        Commands::Admin(AdminCommands::Users(UserCommands::List)) => {
            cmd_admin_users_list(state).await
        }
        Commands::Admin(AdminCommands::Users(UserCommands::Create {
            nome,
            email,
            senha,
            cargo,
            nivel_acesso,
        })) => {
            let request = CreateUserRequest {
                nome: nome.clone(),
                email: email.clone(),
                senha: senha.clone(),
                cargo: parse_cargo(cargo)?,
                nivel_acesso: parse_nivel_acesso(*nivel_acesso)?,
            };
            cmd_admin_users_create(state, request).await
        }
        Commands::Admin(AdminCommands::Os(AdminOsCommands::List)) => {
            cmd_admin_os_list(state).await
        }
    }
}

// ============================================================================
// Command Handlers
// ============================================================================

async fn cmd_login(state: &mut AppState, email: &str, senha: Option<&str>) -> Result<()> {
    let senha = match senha {
        Some(s) => s.to_string(),
        None => prompt_senha()?,
    };

    let client = api_client(state, None)?;
    let response = client.login(email, &senha).await?;

    let user = response.user.clone();
    state.complete_login(response.user, response.access_token)?;

    println!("Login realizado com sucesso!");
    println!();
    println!("Usuário:         {}", user.nome);
    println!("Cargo:           {}", user.cargo);
    println!("Nível de acesso: {}", user.nivel_acesso);
    if can_access_admin(&user) {
        println!();
        println!("Painel Admin disponível: use 'cepe admin users list'.");
    }
    Ok(())
}

fn cmd_logout(state: &mut AppState) -> Result<()> {
    state.logout()?;
    println!("Sessão encerrada.");
    Ok(())
}

fn cmd_whoami(state: &AppState) -> Result<()> {
    let session = require_session(state)?;
    let user = &session.user;

    println!();
    println!("Usuário:         {}", user.nome);
    println!("Email:           {}", user.email);
    println!("Cargo:           {}", user.cargo);
    println!("Nível de acesso: {}", user.nivel_acesso);
    println!("Situação:        {}", if user.ativo { "Ativo" } else { "Inativo" });

    let labels: Vec<&str> = available_tabs(user).iter().map(|t| t.label()).collect();
    println!("Abas:            {}", labels.join(", "));

    let admin_tabs = available_admin_tabs(user);
    if !admin_tabs.is_empty() {
        let labels: Vec<&str> = admin_tabs.iter().map(|t| t.label()).collect();
        println!("Painel Admin:    {}", labels.join(", "));
    }
    println!();
    Ok(())
}

async fn cmd_resumo(state: &AppState) -> Result<()> {
    let session = require_session(state)?;
    let client = api_client(state, Some(&session.token))?;

    let ordens = client.list_ordens().await?;
    let resumo = ResumoOrdens::from_ordens(&ordens);

    println!();
    println!("=== Resumo ===");
    println!();
    println!("Total de OS:  {:<6} Ordens de serviço ativas", resumo.total);
    println!("Em Andamento: {:<6} Aguardando processamento", resumo.em_andamento);
    println!("Concluídas:   {:<6} Entregues ao cliente", resumo.concluidas);
    println!(
        "Meu Cargo:    {} (Nível de acesso: {})",
        session.user.cargo, session.user.nivel_acesso
    );

    println!();
    println!("Ordens de Serviço Recentes:");
    for ordem in ordens.iter().take(5) {
        println!(
            "  {:<12}  {:<28}  {:<26}  {}",
            truncate(&ordem.numero_os, 12),
            truncate(ordem.descricao.as_deref().unwrap_or("Sem descrição"), 28),
            ordem.status,
            format_data(ordem)
        );
    }
    if ordens.is_empty() {
        println!("  Nenhuma ordem de serviço encontrada.");
    }
    println!();
    Ok(())
}

async fn cmd_quadro(state: &AppState) -> Result<()> {
    let session = require_session(state)?;
    let client = api_client(state, Some(&session.token))?;

    let board = client.kanban().await?;

    println!();
    println!("=== Quadro Gestão Gráfica ===");
    if can_create_os(&session.user) {
        println!("(use 'cepe os create' para abrir uma nova OS)");
    }

    for (status, items) in board.columns() {
        println!();
        println!("{} ({})", status, items.len());
        println!("{}", "-".repeat(60));
        for item in items {
            println!(
                "  {:<12}  {:<8}  {:<10}  {}",
                truncate(&item.numero_os, 12),
                item.tipo_os,
                format_data(item),
                truncate(item.descricao.as_deref().unwrap_or("Sem descrição"), 40)
            );
        }
        if items.is_empty() {
            println!("  (vazio)");
        }
    }
    println!();
    Ok(())
}

async fn cmd_os_list(state: &AppState) -> Result<()> {
    let session = require_session(state)?;
    let client = api_client(state, Some(&session.token))?;

    let ordens = client.list_ordens().await?;
    print_ordens_table(&ordens);
    Ok(())
}

async fn cmd_os_create(state: &AppState, request: CreateOrdemRequest) -> Result<()> {
    let session = require_session(state)?;
    if !can_create_os(&session.user) {
        bail!("Seu cargo não permite criar ordens de serviço.");
    }

    let client = api_client(state, Some(&session.token))?;
    let created = client.create_ordem(&request).await?;

    println!("Ordem de Serviço criada com sucesso! ({})", created.numero_os);

    // No local merge: re-fetch so server-side defaults show up as-is.
    let ordens = client.list_ordens().await?;
    print_ordens_table(&ordens);
    Ok(())
}

async fn cmd_admin_users_list(state: &AppState) -> Result<()> {
    let session = require_admin(state)?;
    let client = api_client(state, Some(&session.token))?;

    let users = client.list_users().await?;
    print_users_table(&users);
    Ok(())
}

async fn cmd_admin_users_create(state: &AppState, request: CreateUserRequest) -> Result<()> {
    let session = require_admin(state)?;
    let client = api_client(state, Some(&session.token))?;

    client.register_user(&request).await?;
    println!("Usuário criado com sucesso!");

    let users = client.list_users().await?;
    print_users_table(&users);
    Ok(())
}

async fn cmd_admin_os_list(state: &AppState) -> Result<()> {
    let session = require_admin(state)?;
    let client = api_client(state, Some(&session.token))?;

    let ordens = client.list_ordens().await?;
    print_ordens_table(&ordens);
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn require_session(state: &AppState) -> Result<&Session> {
    state
        .session()
        .context("Você não está autenticado. Use 'cepe login' para entrar.")
}

fn require_admin(state: &AppState) -> Result<&Session> {
    let session = require_session(state)?;
    if !can_access_admin(&session.user) {
        bail!("Acesso restrito: o painel administrativo requer nível de acesso 3.");
    }
    Ok(session)
}

fn api_client(state: &AppState, token: Option<&str>) -> Result<ApiClient> {
    ApiClient::new(
        &state.config.server.api_url,
        state.config.server.timeout_secs,
        token,
    )
}

fn prompt_senha() -> Result<String> {
    print!("Senha: ");
    std::io::stdout().flush()?;
    let mut senha = String::new();
    std::io::stdin()
        .read_line(&mut senha)
        .context("Failed to read password from stdin")?;
    Ok(senha.trim_end_matches(['\r', '\n']).to_string())
}

fn parse_tipo_os(label: &str) -> Result<TipoOs> {
    TipoOs::from_label(label)
        .with_context(|| format!("Tipo de OS inválido: {label} (use \"Externa\" ou \"Interna\")"))
}

fn parse_cargo(label: &str) -> Result<Cargo> {
    Cargo::from_label(label).with_context(|| {
        let valid: Vec<&str> = Cargo::all().iter().map(|c| c.as_str()).collect();
        format!("Cargo inválido: {label} (válidos: {})", valid.join(", "))
    })
}

fn parse_nivel_acesso(nivel: i32) -> Result<i32> {
    if (1..=3).contains(&nivel) {
        Ok(nivel)
    } else {
        bail!("Nível de acesso inválido: {nivel} (use 1, 2 ou 3)");
    }
}

fn print_ordens_table(ordens: &[OrdemServico]) {
    if ordens.is_empty() {
        println!("Nenhuma ordem de serviço encontrada.");
        return;
    }

    println!();
    println!(
        "{:<12}  {:<8}  {:<26}  {:<10}  {:<30}",
        "NÚMERO", "TIPO", "STATUS", "INÍCIO", "DESCRIÇÃO"
    );
    println!("{}", "-".repeat(94));

    for ordem in ordens {
        println!(
            "{:<12}  {:<8}  {:<26}  {:<10}  {:<30}",
            truncate(&ordem.numero_os, 12),
            ordem.tipo_os,
            ordem.status,
            format_data(ordem),
            truncate(ordem.descricao.as_deref().unwrap_or("Sem descrição"), 30)
        );
    }
    println!();
}

fn print_users_table(users: &[User]) {
    if users.is_empty() {
        println!("Nenhum usuário cadastrado.");
        return;
    }

    println!();
    println!(
        "{:<24}  {:<28}  {:<24}  {:<6}  {:<8}",
        "NOME", "EMAIL", "CARGO", "NÍVEL", "SITUAÇÃO"
    );
    println!("{}", "-".repeat(98));

    for user in users {
        println!(
            "{:<24}  {:<28}  {:<24}  {:<6}  {:<8}",
            truncate(&user.nome, 24),
            truncate(&user.email, 28),
            user.cargo,
            user.nivel_acesso,
            if user.ativo { "Ativo" } else { "Inativo" }
        );
    }
    println!("{} usuário(s) cadastrado(s) no sistema", users.len());
    println!();
}

fn format_data(ordem: &OrdemServico) -> String {
    ordem.data_inicio.format("%d/%m/%Y").to_string()
}

/// Truncate a string to max chars with ellipsis. Char-based, since labels and
/// names here carry accents.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_plain() {
        assert_eq!(truncate("OS-0001", 12), "OS-0001");
        assert_eq!(truncate("uma descrição bem longa", 10), "uma des...");
    }

    #[test]
    fn test_truncate_accented_does_not_split_chars() {
        assert_eq!(truncate("Pré-impressão", 8), "Pré-i...");
    }

    #[test]
    fn test_parse_tipo_os() {
        assert_eq!(parse_tipo_os("Interna").unwrap(), TipoOs::Interna);
        assert!(parse_tipo_os("interna").is_err());
    }

    #[test]
    fn test_parse_cargo() {
        assert_eq!(parse_cargo("Impressão Offset").unwrap(), Cargo::ImpressaoOffset);
        assert!(parse_cargo("Estagiário").is_err());
    }

    #[test]
    fn test_parse_nivel_acesso_bounds() {
        assert_eq!(parse_nivel_acesso(1).unwrap(), 1);
        assert_eq!(parse_nivel_acesso(3).unwrap(), 3);
        assert!(parse_nivel_acesso(0).is_err());
        assert!(parse_nivel_acesso(4).is_err());
    }
}
