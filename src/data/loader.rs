use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::model::{Class, DropInClient, Lead, Member, PackClient, Product, Staff};
use crate::store::{StorageError, StudioState};

/// 초기 명부 (저장소가 비어 있을 때 사용)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedRoster {
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub pack_clients: Vec<PackClient>,
    #[serde(default)]
    pub drop_in_clients: Vec<DropInClient>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl SeedRoster {
    /// 명부를 빈 상태로 변환합니다. 정원이 0인 수업은 건너뜁니다.
    pub fn into_state(self) -> StudioState {
        let mut state = StudioState::new();

        for mut class in self.classes {
            if class.capacity == 0 {
                warn!("정원 0인 수업 제외: {}", class.id);
                continue;
            }
            class.booked_count = 0;
            state.insert_class(class);
        }
        for member in self.members {
            state.insert_member(member);
        }
        for client in self.pack_clients {
            state.insert_pack_client(client);
        }
        for client in self.drop_in_clients {
            state.insert_drop_in(client);
        }
        for lead in self.leads {
            state.insert_lead(lead);
        }
        for staff in self.staff {
            state.insert_staff(staff);
        }
        for product in self.products {
            state.insert_product(product);
        }

        state
    }
}

/// 데이터 로더
pub struct DataLoader;

impl DataLoader {
    /// 명부 파일 로드. 파일이 없으면 `None`.
    pub fn load_roster(path: &Path) -> Result<Option<SeedRoster>, StorageError> {
        if !path.exists() {
            warn!("📂 명부 파일이 없음: {}, 빈 스튜디오로 시작", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let roster: SeedRoster = serde_json::from_str(&content)?;

        info!(
            "✅ 명부 로드 완료: 수업 {}개, 회원 {}명, 팩 고객 {}명, 직원 {}명, 상품 {}개",
            roster.classes.len(),
            roster.members.len(),
            roster.pack_clients.len(),
            roster.staff.len(),
            roster.products.len()
        );
        Ok(Some(roster))
    }

    /// 저장소가 비었을 때의 초기 상태
    pub fn initial_state(path: &Path) -> Result<StudioState, StorageError> {
        Ok(Self::load_roster(path)?
            .map(SeedRoster::into_state)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_empty_studio() {
        let dir = tempfile::tempdir().unwrap();
        let state = DataLoader::initial_state(&dir.path().join("nope.json")).unwrap();
        assert_eq!(state, StudioState::new());
    }

    #[test]
    fn test_load_roster() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "classes": [
                    {{"id": "spin-am", "name": "Spin AM", "class_type": "spin", "day_of_week": "Mon",
                      "start_time": "06:30:00", "duration_minutes": 45, "capacity": 12,
                      "coach_id": "c1", "location": "main"}},
                    {{"id": "broken", "name": "Broken", "class_type": "spin", "day_of_week": "Tue",
                      "start_time": "06:30:00", "duration_minutes": 45, "capacity": 0,
                      "coach_id": "c1", "location": "main"}}
                ],
                "pack_clients": [{{"id": "p1", "name": "Paul", "remaining_classes": 5}}],
                "staff": [{{"id": "s1", "name": "Sora", "role": "sales"}}]
            }}"#
        )
        .unwrap();

        let state = DataLoader::initial_state(file.path()).unwrap();
        assert!(state.class("spin-am").is_some());
        assert!(state.class("broken").is_none());
        assert_eq!(state.pack_client("p1").unwrap().remaining_classes, 5);
        assert!(state.staff("s1").is_some());
    }

    #[test]
    fn test_malformed_roster_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DataLoader::load_roster(file.path()),
            Err(StorageError::Serialization(_))
        ));
    }
}
