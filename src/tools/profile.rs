//! Profile tools

use tracing::info;

use super::store_err;
use crate::models::UserProfile;
use crate::store::RecordStore;

/// Fields to change; anything left `None` keeps its current value
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub target_calories: Option<f64>,
    pub daily_water_goal: Option<u32>,
    pub target_weight: Option<f64>,
    pub target_protein: Option<f64>,
}

pub fn get_profile(store: &dyn RecordStore) -> Result<UserProfile, String> {
    store.get_profile().map_err(store_err("Failed to get profile"))
}

pub fn update_profile(store: &dyn RecordStore, update: ProfileUpdate) -> Result<UserProfile, String> {
    let mut profile = get_profile(store)?;

    if let Some(name) = update.name {
        let name = name.trim();
        if name.is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        profile.name = name.to_string();
    }
    if let Some(calories) = update.target_calories {
        if !calories.is_finite() || calories <= 0.0 {
            return Err("Target calories must be greater than 0".to_string());
        }
        profile.target_calories = calories;
    }
    if let Some(goal) = update.daily_water_goal {
        profile.daily_water_goal = goal;
    }
    if let Some(weight) = update.target_weight {
        profile.target_weight = Some(weight).filter(|w| *w > 0.0);
    }
    if let Some(protein) = update.target_protein {
        profile.target_protein = Some(protein).filter(|p| *p > 0.0);
    }

    store
        .save_profile(&profile)
        .map_err(store_err("Failed to save profile"))?;

    info!(name = %profile.name, "Updated profile");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_partial_update() {
        let store = MemoryStore::new();
        assert_eq!(get_profile(&store).unwrap(), UserProfile::default());

        let p = update_profile(
            &store,
            ProfileUpdate {
                name: Some(" Meera ".into()),
                target_weight: Some(58.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(p.name, "Meera");
        assert_eq!(p.target_calories, 2000.0);
        assert_eq!(p.target_weight, Some(58.0));

        // Zero clears an optional target
        let p = update_profile(
            &store,
            ProfileUpdate {
                target_weight: Some(0.0),
                daily_water_goal: Some(8),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(p.target_weight, None);
        assert_eq!(p.daily_water_goal, 8);
        assert_eq!(get_profile(&store).unwrap(), p);
    }

    #[test]
    fn test_rejects_bad_values() {
        let store = MemoryStore::new();
        let blank = ProfileUpdate {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(update_profile(&store, blank).is_err());

        let zero = ProfileUpdate {
            target_calories: Some(0.0),
            ..Default::default()
        };
        assert!(update_profile(&store, zero).is_err());
    }
}
