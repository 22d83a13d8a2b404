//! Built-in catalogs: system tweaks and essential applications.
//!
//! The catalog is pure data plus wiring: each tweak is a set of registry
//! writes expressed against the [`SettingStore`] seam, each application is
//! one WinGet package id. Population happens once at startup; the registry
//! is read-only afterwards.

use crate::action::Action;
use crate::error::Result;
use crate::registry::ActionRegistry;
use crate::settings::{Hive, SettingStore};
use crate::winget::PackageTool;
use std::sync::Arc;
use strum::{Display, EnumString};

/// Catalog section an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumString)]
pub enum Section {
    #[strum(serialize = "System Tweaks")]
    Tweaks,
    #[strum(serialize = "Essential Apps (WinGet)")]
    Apps,
}

/// One registry value a tweak writes.
struct RegValue {
    hive: Hive,
    path: &'static str,
    name: &'static str,
    value: u32,
}

/// Static tweak table: id, label, recommended flag, and the values written.
struct TweakDef {
    id: &'static str,
    label: &'static str,
    recommended: bool,
    writes: &'static [RegValue],
}

const TWEAKS: &[TweakDef] = &[
    TweakDef {
        id: "disable-advertising-id",
        label: "Disable Advertising ID",
        recommended: true,
        writes: &[RegValue {
            hive: Hive::CurrentUser,
            path: "Software\\Microsoft\\Windows\\CurrentVersion\\AdvertisingInfo",
            name: "Enabled",
            value: 0,
        }],
    },
    TweakDef {
        id: "show-file-extensions",
        label: "Show File Extensions",
        recommended: true,
        writes: &[RegValue {
            hive: Hive::CurrentUser,
            path: "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Advanced",
            name: "HideFileExt",
            value: 0,
        }],
    },
    TweakDef {
        id: "disable-windows-tips",
        label: "Disable Windows Tips",
        recommended: true,
        writes: &[RegValue {
            hive: Hive::CurrentUser,
            path: "Software\\Microsoft\\Windows\\CurrentVersion\\ContentDeliveryManager",
            name: "SubscribedContent-338388Enabled",
            value: 0,
        }],
    },
    TweakDef {
        id: "disable-bing-search",
        label: "Disable Bing Search in Start Menu",
        recommended: true,
        writes: &[RegValue {
            hive: Hive::CurrentUser,
            path: "Software\\Microsoft\\Windows\\CurrentVersion\\Search",
            name: "BingSearchEnabled",
            value: 0,
        }],
    },
    TweakDef {
        id: "disable-copilot",
        label: "Disable Windows Copilot",
        recommended: true,
        // Policy value plus the taskbar button toggle, both per-user.
        writes: &[
            RegValue {
                hive: Hive::CurrentUser,
                path: "SOFTWARE\\Policies\\Microsoft\\Windows\\WindowsCopilot",
                name: "TurnOffWindowsCopilot",
                value: 1,
            },
            RegValue {
                hive: Hive::CurrentUser,
                path: "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Advanced",
                name: "ShowCopilotButton",
                value: 0,
            },
        ],
    },
];

/// Static application table: display name and WinGet package id.
const APPS: &[(&str, &str)] = &[
    ("Google Chrome", "Google.Chrome"),
    ("Mozilla Firefox", "Mozilla.Firefox"),
    ("Brave Browser", "Brave.Brave"),
    ("7-Zip", "7zip.7zip"),
    ("Notepad++", "Notepad++.Notepad++"),
    ("Everything (Voidtools)", "voidtools.Everything"),
    ("Visual Studio Code", "Microsoft.VisualStudioCode"),
    ("Git", "Git.Git"),
    ("VLC Media Player", "VideoLAN.VLC"),
];

/// Build the tweak registry against a settings backend.
pub fn tweak_registry(store: Arc<dyn SettingStore>) -> Result<ActionRegistry> {
    let mut registry = ActionRegistry::new();
    for def in TWEAKS {
        let store = Arc::clone(&store);
        let writes = def.writes;
        registry.register(Action::new(
            def.id,
            def.label,
            def.recommended,
            Box::new(move || {
                for w in writes {
                    store.set_dword(w.hive, w.path, w.name, w.value)?;
                }
                Ok(())
            }),
        ))?;
    }
    Ok(registry)
}

/// Build the application registry against a package tool.
pub fn app_registry(tool: Arc<PackageTool>) -> Result<ActionRegistry> {
    let mut registry = ActionRegistry::new();
    for (label, package_id) in APPS {
        registry.register(tool.install_action(*label, *package_id))?;
    }
    Ok(registry)
}
