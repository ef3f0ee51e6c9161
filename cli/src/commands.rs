use std::fs;
use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use clashdash_core::api::{ApiClient, RefreshGate};
use clashdash_core::import::import_export;
use clashdash_core::notify;
use clashdash_core::profile::NewProfile;
use clashdash_core::upgrade::{BuilderSlot, TimerContext, builder_slots};
use clashdash_core::{ActiveBoost, AppConfig, BoostKind};
use clashdash_types::formatting::format_clock;
use clashdash_types::{GOLD_PASS_STEPS, NotificationSettings, UpgradeCategory};

use crate::state::CliState;

type Shared = Arc<RwLock<CliState>>;

fn local(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%a %b %-d %H:%M")
        .to_string()
}

/// Resolve a 1-based profile index
fn profile_id(state: &CliState, index: usize) -> Result<Uuid, String> {
    index
        .checked_sub(1)
        .and_then(|i| state.store.profiles().get(i))
        .map(|p| p.id)
        .ok_or_else(|| format!("No profile #{index}"))
}

pub async fn import_file(path: &str, state: Shared) -> Result<(), String> {
    let input = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?
    };

    let mut s = state.write().await;
    let result = import_export(&input, &s.catalog, Utc::now()).map_err(|e| e.to_string())?;
    let count = result.upgrades.len();
    s.store.apply_import(result);
    s.persist()?;
    println!(
        "Imported {} running upgrades into {}",
        count,
        s.store.current().visible_name()
    );
    Ok(())
}

pub async fn show_status(state: Shared) -> Result<(), String> {
    let s = state.read().await;
    let now = Utc::now();
    let profile = s.store.current();
    let timers = s.timers(now);

    println!("{}", profile.widget_title());
    if let Some(imported) = profile.last_import_date {
        println!("Imported {}", local(imported));
    }
    if timers.is_empty() {
        println!("No upgrades running");
        return Ok(());
    }

    for (i, timer) in timers.iter().enumerate() {
        println!(
            "{:>3}. {:<28} lvl {:<3} {:<12} {:>10} {:>7}  done {}",
            i + 1,
            timer.name,
            timer.target_level,
            timer.category.label(),
            format_clock(timer.remaining_seconds.ceil() as i64),
            timer.progress_label(),
            local(timer.completes_at),
        );
    }
    let boosts = profile
        .active_boosts
        .iter()
        .filter(|b| !b.is_expired(now))
        .count();
    if boosts > 0 {
        println!("{boosts} boost(s) active or scheduled");
    }
    Ok(())
}

pub async fn show_widget(state: Shared) -> Result<(), String> {
    let s = state.read().await;
    let profile = s.store.current();
    let ctx = TimerContext::new(
        &profile.active_boosts,
        profile.gold_pass_percent(),
        Utc::now(),
    );
    let slots = builder_slots(
        &profile.active_upgrades,
        profile.builder_count as usize,
        &ctx,
    );

    println!("Builders - {}", profile.widget_title());
    for pair in slots.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|slot| format!("{:<24} {:>8}", slot.title(), slot.subtitle()))
            .collect();
        println!("{}", cells.join(" | "));
    }
    let busy = slots
        .iter()
        .filter(|slot| matches!(slot, BuilderSlot::Busy(_)))
        .count();
    println!("{busy}/{} builders busy", profile.builder_count);
    Ok(())
}

pub async fn list_profiles(state: Shared) -> Result<(), String> {
    let s = state.read().await;
    let selected = s.store.selected_id();
    for (i, profile) in s.store.profiles().iter().enumerate() {
        let marker = if profile.id == selected { "*" } else { " " };
        let tag = if profile.tag.is_empty() {
            String::new()
        } else {
            format!("#{}", profile.tag)
        };
        println!(
            "{marker} {:>2}. {:<20} {:<12} {} upgrades",
            i + 1,
            profile.visible_name(),
            tag,
            profile.active_upgrades.len()
        );
    }
    Ok(())
}

pub async fn add_profile(tag: &str, builders: Option<u32>, state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    let options = NewProfile {
        builder_count: builders.unwrap_or(NewProfile::default().builder_count),
        ..NewProfile::default()
    };
    let before = s.store.profiles().len();
    s.store.add_profile(tag, options);
    if s.store.profiles().len() == before {
        return Err("Tag is empty".to_string());
    }
    s.persist()?;
    println!("Added {}", s.store.current().visible_name());
    Ok(())
}

pub async fn select_profile(index: usize, state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    let id = profile_id(&s, index)?;
    s.store.select(id);
    s.persist()?;
    println!("Selected {}", s.store.current().visible_name());
    Ok(())
}

pub async fn rename_profile(
    index: usize,
    name: &str,
    tag: Option<&str>,
    state: Shared,
) -> Result<(), String> {
    let mut s = state.write().await;
    let id = profile_id(&s, index)?;
    let tag = match tag {
        Some(tag) => tag.to_string(),
        None => s.store.get(id).map(|p| p.tag.clone()).unwrap_or_default(),
    };
    s.store.update(id, name, &tag);
    s.persist()?;
    println!("Renamed to {}", s.store.display_name(id).unwrap_or_default());
    Ok(())
}

pub async fn delete_profile(index: usize, state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    let id = profile_id(&s, index)?;
    s.store.delete(id);
    s.persist()?;
    println!("Deleted profile #{index}");
    Ok(())
}

pub struct BoostRequest {
    pub kind: BoostKind,
    pub minutes: Option<i64>,
    pub level: Option<u8>,
    /// 1-based row from `status`
    pub target: Option<usize>,
    pub bonus: Option<f64>,
}

/// Boost starting at `now`, lasting `minutes` or the kind's default
fn boost_window(kind: BoostKind, minutes: Option<i64>, now: DateTime<Utc>) -> Result<ActiveBoost, String> {
    match minutes {
        Some(minutes) if minutes > 0 => Duration::try_minutes(minutes)
            .and_then(|duration| ActiveBoost::for_duration(kind, now, duration))
            .ok_or_else(|| "Minutes out of range".to_string()),
        Some(_) => Err("Minutes must be positive".to_string()),
        None => Ok(ActiveBoost::starting_at(kind, now)),
    }
}

pub async fn add_boost(request: BoostRequest, state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    let now = Utc::now();
    let kind = request.kind;

    let mut boost = boost_window(kind, request.minutes, now)?;

    if kind.is_targeted() {
        let row = request
            .target
            .ok_or_else(|| format!("{} needs --target <row from status>", kind.label()))?;
        let timers = s.timers(now);
        let timer = row
            .checked_sub(1)
            .and_then(|i| timers.get(i))
            .ok_or_else(|| format!("No upgrade in row {row}"))?;
        if !kind.affects(timer.category) {
            return Err(format!(
                "{} cannot work on {}",
                kind.label(),
                timer.category.label()
            ));
        }
        boost = boost.targeting(timer.id);
    }

    if kind.is_leveled() {
        let profile = s.store.current();
        let saved = match kind {
            BoostKind::LabAssistant => profile.lab_assistant_level,
            _ => profile.builder_apprentice_level,
        };
        let level = request.level.unwrap_or(saved);
        if level > 0 {
            boost = boost.with_level(level);
        }
    }
    if let Some(bonus) = request.bonus {
        boost = boost.with_bonus(bonus);
    }

    println!(
        "{} (+{}) until {}",
        kind.label(),
        boost.speed_bonus(),
        local(boost.end)
    );
    s.store.add_boost(boost);
    s.persist()
}

pub async fn clear_boosts(state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    s.store.clear_boosts();
    s.persist()?;
    println!("Cleared boosts");
    Ok(())
}

/// Gold pass boosts only come in the season pass steps
fn gold_pass_step(percent: i64) -> Result<i64, String> {
    GOLD_PASS_STEPS
        .iter()
        .map(|&step| i64::from(step))
        .find(|&step| step == percent)
        .ok_or_else(|| {
            let steps: Vec<String> = GOLD_PASS_STEPS.iter().map(u8::to_string).collect();
            format!("Gold pass boost must be one of {}", steps.join(", "))
        })
}

pub async fn set_gold_pass(percent: i64, state: Shared) -> Result<(), String> {
    let percent = gold_pass_step(percent)?;
    let mut s = state.write().await;
    s.store.set_gold_pass(percent);
    s.persist()?;
    println!("Gold pass boost {}%", s.store.current().gold_pass_boost);
    Ok(())
}

/// Lead time from the profile, or the configured default when it has none
fn effective_settings(settings: &NotificationSettings, config: &AppConfig) -> NotificationSettings {
    let mut settings = settings.clone();
    if settings.pre_notify_minutes == 0 {
        settings.pre_notify_minutes = config.pre_notify_minutes;
    }
    settings
}

pub async fn show_notifications(enable: Option<bool>, state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    if let Some(enabled) = enable {
        s.store.current_mut().notification_settings.notifications_enabled = enabled;
        s.persist()?;
    }

    let profile = s.store.current();
    let settings = effective_settings(&profile.notification_settings, &s.config);
    let plan = notify::plan(
        &profile.active_upgrades,
        &profile.active_boosts,
        &settings,
        Utc::now(),
    );

    if !settings.notifications_enabled {
        println!("Notifications are off");
        return Ok(());
    }
    for category in UpgradeCategory::ALL {
        let toggle = if settings.allows(category) { "on" } else { "off" };
        println!("{:<16} {toggle}", category.label());
    }
    if plan.is_empty() {
        println!("Nothing to schedule");
    }
    for request in &plan {
        println!("{}  {}", local(request.fire_at), request.body);
    }
    Ok(())
}

pub async fn prune(state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    let now = Utc::now();
    let upgrades = s.store.prune_completed(now);
    let boosts = s.store.prune_expired_boosts(now);
    s.persist()?;
    println!("Removed {upgrades} finished upgrades and {boosts} expired boosts");
    Ok(())
}

pub async fn clear_data(state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    s.store.clear_data();
    s.persist()?;
    println!("Cleared {}", s.store.current().visible_name());
    Ok(())
}

pub async fn reset(state: Shared) -> Result<(), String> {
    let mut s = state.write().await;
    s.store.reset();
    s.appearance = Default::default();
    s.state_file.clear().map_err(|e| e.to_string())?;
    s.persist()?;
    println!("Reset to a single empty profile");
    Ok(())
}

pub async fn refresh(state: Shared) -> Result<(), String> {
    let (client, id, tag, last_fetch) = {
        let s = state.read().await;
        let profile = s.store.current();
        if profile.tag.is_empty() {
            return Err("Current profile has no tag".to_string());
        }
        let client = ApiClient::new(&s.config.api_base_url, s.config.api_key().as_deref())
            .map_err(|e| e.to_string())?;
        (client, profile.id, profile.tag.clone(), profile.last_api_fetch_date)
    };

    RefreshGate::default()
        .check(last_fetch, Utc::now())
        .map_err(|e| e.to_string())?;

    let fetched = client.fetch_player(&tag).await.map_err(|e| {
        tracing::warn!(error = %e, %tag, "Profile refresh failed");
        e.to_string()
    })?;

    let mut s = state.write().await;
    let summary = format!(
        "{} - Town Hall {} - {} trophies",
        fetched.profile.name, fetched.profile.town_hall_level, fetched.profile.trophies
    );
    s.store.store_api_profile(id, fetched, Utc::now());
    s.persist()?;
    println!("{summary}");
    Ok(())
}

pub async fn show_settings(state: Shared) -> Result<(), String> {
    let s = state.read().await;
    let config = &s.config;
    match AppConfig::config_path() {
        Ok(path) => println!("config file:   {}", path.display()),
        Err(e) => println!("config file:   unavailable ({e})"),
    }
    println!("state file:    {}", s.state_file.path().display());
    println!("catalog dir:   {}", config.catalog_dir.display());
    println!("api base url:  {}", config.api_base_url);
    println!(
        "api key:       {}",
        if config.api_key().is_some() { "set" } else { "not set" }
    );
    if let Some(dir) = &config.log_dir {
        println!("log dir:       {}", dir.display());
    }
    println!("pre-notify:    {} min", config.pre_notify_minutes);
    println!("appearance:    {:?}", s.appearance);
    Ok(())
}

pub fn exit() {
    println!("Bye");
}
