use core_types::FontId;
use layout::LayoutOptions;
use style::BaseStyle;

/// Per-view settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextViewConfig {
    pub font: FontId,
    pub layout: LayoutOptions,
    pub style: BaseStyle,
}
