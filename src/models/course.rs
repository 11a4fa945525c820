//! 课程与上课时段（固定选项）

use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormError;

/// 课程枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    Animation3dBlender,
    ArtificialIntelligence,
    Amazon,
    AudioVideoEditing,
    CitDitAdit,
    ContentWriting,
    DataScience,
    DigitalMarketing,
    EnglishLanguage,
    ForexTrading,
    FullStackDevelopment,
    GraphicDesigning,
    JavaWithDsa,
    LaravelWebDevelopment,
    MobileApplicationDevelopment,
    ModernWebAndAppDevelopment,
    OfficeAutomation,
    Photoshop,
    PythonDevelopment,
    PythonBasics,
    Seo,
    UiUxDesigning,
    Vlogging,
    WebDesigning,
    WebDevelopment,
    WordPressCustomization,
}

// 显示名 -> 课程
static COURSE_MAP: phf::Map<&'static str, Course> = phf_map! {
    "3D Animation (Blender)" => Course::Animation3dBlender,
    "AI Artificial Intelligence" => Course::ArtificialIntelligence,
    "Amazon" => Course::Amazon,
    "Audio Video Editing" => Course::AudioVideoEditing,
    "CIT, DIT, ADIT" => Course::CitDitAdit,
    "Content Writing" => Course::ContentWriting,
    "Data Science" => Course::DataScience,
    "Digital Marketing" => Course::DigitalMarketing,
    "English Language" => Course::EnglishLanguage,
    "Forex Trading" => Course::ForexTrading,
    "Full Stack Development" => Course::FullStackDevelopment,
    "Graphic Designing" => Course::GraphicDesigning,
    "Java with DSA" => Course::JavaWithDsa,
    "Laravel (PHP Framework) Web Development" => Course::LaravelWebDevelopment,
    "Mobile Application Development" => Course::MobileApplicationDevelopment,
    "Modern Web and App Development" => Course::ModernWebAndAppDevelopment,
    "Office Automation" => Course::OfficeAutomation,
    "Photoshop" => Course::Photoshop,
    "Python Development" => Course::PythonDevelopment,
    "Python Basics" => Course::PythonBasics,
    "SEO" => Course::Seo,
    "UI/UX Designing" => Course::UiUxDesigning,
    "Vlogging" => Course::Vlogging,
    "Web Designing" => Course::WebDesigning,
    "Web Development" => Course::WebDevelopment,
    "WordPress Customization (Theme + Plugin) Development" => Course::WordPressCustomization,
};

impl Course {
    /// 下拉框中的排列顺序
    pub const ALL: [Course; 26] = [
        Course::Animation3dBlender,
        Course::ArtificialIntelligence,
        Course::Amazon,
        Course::AudioVideoEditing,
        Course::CitDitAdit,
        Course::ContentWriting,
        Course::DataScience,
        Course::DigitalMarketing,
        Course::EnglishLanguage,
        Course::ForexTrading,
        Course::FullStackDevelopment,
        Course::GraphicDesigning,
        Course::JavaWithDsa,
        Course::LaravelWebDevelopment,
        Course::MobileApplicationDevelopment,
        Course::ModernWebAndAppDevelopment,
        Course::OfficeAutomation,
        Course::Photoshop,
        Course::PythonDevelopment,
        Course::PythonBasics,
        Course::Seo,
        Course::UiUxDesigning,
        Course::Vlogging,
        Course::WebDesigning,
        Course::WebDevelopment,
        Course::WordPressCustomization,
    ];

    /// 显示名
    pub fn label(self) -> &'static str {
        match self {
            Course::Animation3dBlender => "3D Animation (Blender)",
            Course::ArtificialIntelligence => "AI Artificial Intelligence",
            Course::Amazon => "Amazon",
            Course::AudioVideoEditing => "Audio Video Editing",
            Course::CitDitAdit => "CIT, DIT, ADIT",
            Course::ContentWriting => "Content Writing",
            Course::DataScience => "Data Science",
            Course::DigitalMarketing => "Digital Marketing",
            Course::EnglishLanguage => "English Language",
            Course::ForexTrading => "Forex Trading",
            Course::FullStackDevelopment => "Full Stack Development",
            Course::GraphicDesigning => "Graphic Designing",
            Course::JavaWithDsa => "Java with DSA",
            Course::LaravelWebDevelopment => "Laravel (PHP Framework) Web Development",
            Course::MobileApplicationDevelopment => "Mobile Application Development",
            Course::ModernWebAndAppDevelopment => "Modern Web and App Development",
            Course::OfficeAutomation => "Office Automation",
            Course::Photoshop => "Photoshop",
            Course::PythonDevelopment => "Python Development",
            Course::PythonBasics => "Python Basics",
            Course::Seo => "SEO",
            Course::UiUxDesigning => "UI/UX Designing",
            Course::Vlogging => "Vlogging",
            Course::WebDesigning => "Web Designing",
            Course::WebDevelopment => "Web Development",
            Course::WordPressCustomization => {
                "WordPress Customization (Theme + Plugin) Development"
            }
        }
    }

    /// 按显示名精确匹配
    pub fn from_label(label: &str) -> Result<Self, FormError> {
        COURSE_MAP
            .get(label)
            .copied()
            .ok_or_else(|| FormError::UnknownChoice {
                field: "course",
                value: label.to_string(),
            })
    }
}

/// 上课时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    ThreePm,
    FourPm,
    FivePm,
    SixPm,
    SevenPm,
    EightPm,
}

static TIMING_MAP: phf::Map<&'static str, Timing> = phf_map! {
    "03:00 PM - 04:00 PM" => Timing::ThreePm,
    "04:00 PM - 05:00 PM" => Timing::FourPm,
    "05:00 PM - 06:00 PM" => Timing::FivePm,
    "06:00 PM - 07:00 PM" => Timing::SixPm,
    "07:00 PM - 08:00 PM" => Timing::SevenPm,
    "08:00 PM - 09:00 PM" => Timing::EightPm,
};

impl Timing {
    pub const ALL: [Timing; 6] = [
        Timing::ThreePm,
        Timing::FourPm,
        Timing::FivePm,
        Timing::SixPm,
        Timing::SevenPm,
        Timing::EightPm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timing::ThreePm => "03:00 PM - 04:00 PM",
            Timing::FourPm => "04:00 PM - 05:00 PM",
            Timing::FivePm => "05:00 PM - 06:00 PM",
            Timing::SixPm => "06:00 PM - 07:00 PM",
            Timing::SevenPm => "07:00 PM - 08:00 PM",
            Timing::EightPm => "08:00 PM - 09:00 PM",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, FormError> {
        TIMING_MAP
            .get(label)
            .copied()
            .ok_or_else(|| FormError::UnknownChoice {
                field: "timing",
                value: label.to_string(),
            })
    }
}

macro_rules! label_serde {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                Self::from_label(&label).map_err(serde::de::Error::custom)
            }
        }
    };
}

label_serde!(Course);
label_serde!(Timing);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_course_label_round_trips_through_the_map() {
        assert_eq!(COURSE_MAP.len(), Course::ALL.len());
        for course in Course::ALL {
            assert_eq!(Course::from_label(course.label()).unwrap(), course);
        }
    }

    #[test]
    fn test_every_timing_label_round_trips_through_the_map() {
        assert_eq!(TIMING_MAP.len(), Timing::ALL.len());
        for timing in Timing::ALL {
            assert_eq!(Timing::from_label(timing.label()).unwrap(), timing);
        }
    }

    #[test]
    fn test_labels_are_matched_exactly() {
        assert!(Course::from_label("data science").is_err());
        assert!(Course::from_label("").is_err());
        let err = Timing::from_label("09:00 PM - 10:00 PM").unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownChoice {
                field: "timing",
                value: "09:00 PM - 10:00 PM".to_string()
            }
        );
    }
}
