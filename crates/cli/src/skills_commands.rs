use std::path::Path;

use {
    anyhow::{Result, bail},
    skilldash_bridge::ToolRequest,
    skilldash_skills::{AgentInfo, ScopeFilter, SkillRecord, SkillScope, aggregate::filter_scope},
    skilldash_state::{check_updates, run_mutation},
};

use crate::app::{App, stream_output};

pub async fn agents(all: bool, json: bool) -> Result<()> {
    let app = App::load().await?;
    let agents: Vec<&AgentInfo> = app
        .state
        .report
        .display_order()
        .into_iter()
        .filter(|a| all || a.detected)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }
    if agents.is_empty() {
        println!("No agents detected. Use --all to list every known agent.");
        return Ok(());
    }
    for agent in agents {
        let mark = if agent.detected { "●" } else { "○" };
        println!(
            "{mark} {:<22} {:<16} {:>3} global  {:>3} project  {}",
            agent.display_name,
            agent.id,
            agent.global.skills.len(),
            agent.projects.iter().map(|p| p.skills.len()).sum::<usize>(),
            agent.global.path.display(),
        );
    }
    Ok(())
}

pub async fn skills(scope: ScopeFilter, json: bool) -> Result<()> {
    let app = App::load().await?;
    let skills = filter_scope(app.state.skills.clone(), scope);

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }
    if skills.is_empty() {
        println!("No skills found.");
        return Ok(());
    }
    for skill in &skills {
        print_skill_line(skill);
    }
    Ok(())
}

pub async fn show(name: &str, json: bool) -> Result<()> {
    let app = App::load().await?;
    let matches: Vec<&SkillRecord> = app
        .state
        .skills
        .iter()
        .filter(|s| s.name == name || s.install_path == Path::new(name))
        .collect();
    if matches.is_empty() {
        bail!("no installed skill named '{name}'");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }
    for (i, skill) in matches.iter().enumerate() {
        if i > 0 {
            println!("\n---\n");
        }
        println!("Name:        {}", skill.name);
        if !skill.description.is_empty() {
            println!("Description: {}", skill.description);
        }
        println!("Scope:       {}", skill.scope);
        println!("Agents:      {}", skill.agents.join(", "));
        if let Some(ref license) = skill.license {
            println!("License:     {license}");
        }
        if let Some(ref compatibility) = skill.compatibility {
            println!("Compat:      {compatibility}");
        }
        if let Some(ref tools) = skill.allowed_tools {
            println!("Tools:       {tools}");
        }
        for (key, value) in &skill.metadata {
            println!("Meta:        {key} = {value}");
        }
        if skill.has_update {
            println!("Update:      available");
        }
        println!("Path:        {}", skill.install_path.display());
        println!("\n{}", skill.body.trim_end());
    }
    Ok(())
}

pub async fn check(json: bool) -> Result<()> {
    let mut app = App::load().await?;
    let (tx, printer) = stream_output();
    let result = check_updates(&mut app.state, &app.runner, Some(tx)).await;
    let _ = printer.await;
    let updates = result?;
    app.save_session();

    if json {
        println!("{}", serde_json::to_string_pretty(&updates)?);
        return Ok(());
    }
    for update in &updates {
        match (&update.current_version, &update.latest_version) {
            (Some(current), Some(latest)) => println!("{}: {current} -> {latest}", update.name),
            _ => println!("{}: update available", update.name),
        }
    }
    if let Some(summary) = app.state.output_log.last() {
        println!("{summary}");
    }
    Ok(())
}

pub async fn update(name: Option<String>) -> Result<()> {
    let request = match name {
        Some(name) => ToolRequest::update_one(name),
        None => ToolRequest::update_all(),
    };
    mutate(request).await
}

/// Run a tool request that changes installed skills and report the result.
pub async fn mutate(request: ToolRequest) -> Result<()> {
    let mut app = App::load().await?;
    let before = app.state.skills.len();
    let (tx, printer) = stream_output();
    let result = run_mutation(
        &mut app.state,
        &app.runner,
        &app.scanner,
        request.clone(),
        Some(tx),
    )
    .await;
    let _ = printer.await;
    app.save_session();
    let output = result?;

    let after = app.state.skills.len();
    if output.success() {
        println!(
            "{} finished: {after} skill(s) installed ({:+}).",
            request.verb,
            after as i64 - before as i64
        );
    } else {
        println!(
            "{} exited with code {}; rescanned, {after} skill(s) installed.",
            request.verb, output.exit_code
        );
    }
    Ok(())
}

#[cfg(feature = "file-watcher")]
pub async fn watch() -> Result<()> {
    use {
        skilldash_skills::watcher::{SkillWatchEvent, SkillWatcher},
        skilldash_state::refresh,
        std::time::Duration,
        tracing::info,
    };

    let mut app = App::load().await?;
    let debounce = Duration::from_millis(app.config.watch.debounce_ms);
    let mut dirs = app.state.report.existing_skill_dirs();
    let (mut watcher, mut rx) = SkillWatcher::start(dirs.clone(), debounce)?;
    print_summary(&app);
    eprintln!(
        "Watching {} skills director{} (Ctrl-C to stop).",
        watcher.watched().len(),
        if watcher.watched().len() == 1 { "y" } else { "ies" }
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(SkillWatchEvent::Changed { path }) = event else {
                    break;
                };
                info!(path = %path.display(), "skill changed on disk");
                eprintln!("changed: {}", path.display());
                refresh(&mut app.state, &app.scanner).await?;
                print_summary(&app);

                let current = app.state.report.existing_skill_dirs();
                if current != dirs {
                    dirs = current;
                    (watcher, rx) = SkillWatcher::start(dirs.clone(), debounce)?;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    drop(watcher);
    Ok(())
}

#[cfg(feature = "file-watcher")]
fn print_summary(app: &App) {
    let skills = &app.state.skills;
    let global = skills.iter().filter(|s| s.scope == SkillScope::Global).count();
    println!(
        "{} agent(s) detected, {} skill(s) ({global} global, {} project)",
        app.state.report.detected().count(),
        skills.len(),
        skills.len() - global,
    );
}

fn print_skill_line(skill: &SkillRecord) {
    let flag = if skill.has_update { " [update]" } else { "" };
    let scope = match skill.scope {
        SkillScope::Global => "global ",
        SkillScope::Project => "project",
    };
    println!(
        "{:<28} {scope} {:<30} {}{flag}",
        skill.name,
        skill.agents.join(","),
        skill.install_path.display(),
    );
    if !skill.description.is_empty() {
        println!("    {}", skill.description);
    }
}
