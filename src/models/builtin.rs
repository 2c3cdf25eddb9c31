/// Market names shipped with the tool, keyed by model code.
pub(super) const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("Encore_VZW", "TCL 40XE 5G"),
    ("Fun", "Orbic Fun Pro 5G"),
    ("JOY2", "Orbic Joy 2"),
    ("KY22M-RG100", "DuraForce Pro 3"),
    ("OnePlus8VZW", "OnePLus 8"),
    ("Ruby_VZW", "TCL 50 XL"),
    ("Style", "Orbic Style 5G"),
    ("Trophy", "Orbic Trophy 5G UW"),
    ("Wa42xuq", "Galaxy A42 5G"),
    ("Wa71", "A71"),
    ("X800", "XP Pro 5G"),
    ("a01q", "Galaxy A01"),
    ("a02q", "Galaxy A02"),
    ("a03su", "Galaxy A03s"),
    ("a10e", "A10e"),
    ("a11q", "A11"),
    ("a13", "A13"),
    ("a15x", "Galaxy A15 5G"),
    ("a16x", "Galaxy A16 5G"),
    ("a20p", "A20"),
    ("a21", "A21"),
    ("a23xq", "Galaxy A23 5G UW"),
    ("a36xq", "Galaxy A36 5G"),
    ("a42xuq", "Galaxy A42 5G"),
    ("a50", "A50"),
    ("a51", "A51"),
    ("a51xq", "A51 5G"),
    ("a53x", "Galaxy A53 5G"),
    ("a54x", "Galaxy A54 5G"),
    ("a71xq", "A71"),
    ("aito", "motorola razr 2025"),
    ("akita", "Pixel 8a"),
    ("b0q", "Galaxy S22 Ultra"),
    ("b2q", "Galaxy Z Flip3 5G"),
    ("b4q", "Galaxy Z Flip4 5G"),
    ("b5q", "Galaxy Z Flip5 5G"),
    ("b6q", "Galaxy Z Flip6 5G"),
    ("b7s", "Galaxy Z Flip 7"),
    ("berlna", "Moto Edge 2021 (XT-2141)"),
    ("beyond0q", "Samsung S10e"),
    ("beyond1q", "Samsung S10"),
    ("beyond2q", "S10+"),
    ("beyondxq", "Samsung S10 5G"),
    ("bluejay", "Pixel 6a"),
    ("blueline", "Pixel 3"),
    ("bonito", "Pixel 3a XL"),
    ("borneo", "Moto G Power (2021)"),
    ("boston", "moto g stylus - 2024"),
    ("bramble", "Pixel 4a 5G"),
    ("burton", "Moto Edge Plus"),
    ("c1q", "Galaxy Note 20 5G"),
    ("c2q", "Galaxy Note 20 Ultra 5G"),
    ("caiman", "Pixel 9 Pro"),
    ("channel", "moto g(7) play"),
    ("cheetah", "Pixel 7 Pro"),
    ("coral", "Pixel 4 XL"),
    ("crosshatch", "Pixel 3 XL"),
    ("crownqltesq", "Galaxy Note9"),
    ("crownqlteue", "Galaxy Note9"),
    ("d1q", "Galaxy Note 10"),
    ("d2q", "Galaxy Note 10+"),
    ("d2xq", "Galaxy Note 10 5G"),
    ("dm1q", "Galaxy S23"),
    ("dm2q", "Galaxy S23+"),
    ("dm3q", "Galaxy S23 Ultra"),
    ("dream2qltesq", "Galaxy S8+"),
    ("dreamqltesq", "Galaxy S8"),
    ("e1q", "Galaxy S24"),
    ("e2q", "Galaxy S24+"),
    ("e3q", "Galaxy S24 Ultra"),
    ("flame", "Pixel 4"),
    ("foles", "moto z4"),
    ("g0q", "Galaxy S22+"),
    ("greatqlte", "Galaxy Note8"),
    ("guamna", "Moto G Play (2021)"),
    ("hero2qltevzw", "Galaxy S7 Edge"),
    ("heroqltevzw", "Galaxy S7"),
    ("hiphi", "motorola edge plus 5G UW (2022)"),
    ("husky", "Pixel 8 Pro"),
    ("iPhone10,1", "iPhone 8"),
    ("iPhone10,2", "iPhone 8 Plus"),
    ("iPhone10,3", "iPhone X"),
    ("iPhone10,5", "iPhone 8 Plus"),
    ("iPhone10,6", "iPhone X"),
    ("iPhone11,2", "iPhone XS"),
    ("iPhone11,6", "iPhone XS Max"),
    ("iPhone11,8", "iPhone XR"),
    ("iPhone12,1", "iPhone 11"),
    ("iPhone12,3", "iPhone 11 Pro"),
    ("iPhone12,5", "iPhone 11 Pro Max"),
    ("iPhone12,8", "iPhone SE 2"),
    ("iPhone13,1", "iPhone 12 Mini"),
    ("iPhone13,2", "iPhone 12"),
    ("iPhone13,3", "iPhone 12 Pro"),
    ("iPhone13,4", "iPhone 12 Pro Max"),
    ("iPhone14,2", "iPhone 13 Pro"),
    ("iPhone14,3", "iPhone 13 Pro Max"),
    ("iPhone14,4", "iPhone 13 Mini"),
    ("iPhone14,5", "iPhone 13"),
    ("iPhone14,6", "iPhone SE 3"),
    ("iPhone14,7", "iPhone 14"),
    ("iPhone14,8", "iPhone 14 Plus"),
    ("iPhone15,2", "iPhone 14 Pro"),
    ("iPhone15,3", "iPhone 14 Pro Max"),
    ("iPhone15,4", "iPhone 15"),
    ("iPhone15,5", "iPhone 15 Plus"),
    ("iPhone16,1", "iPhone 15 Pro"),
    ("iPhone16,2", "iPhone 15 Pro Max"),
    ("iPhone17,1", "iPhone 16 Pro"),
    ("iPhone17,2", "iPhone 16 Pro Max"),
    ("iPhone17,3", "iPhone 16"),
    ("iPhone17,4", "iPhone 16 Plus"),
    ("iPhone17,5", "iPhone 16e"),
    ("iPhone7,1", "iPhone 6 Plus"),
    ("iPhone7,2", "iPhone 6"),
    ("iPhone8,1", "iPhone 6S"),
    ("iPhone8,2", "iPhone 6S Plus"),
    ("iPhone8,4", "iPhone SE"),
    ("iPhone9,1", "iPhone 7"),
    ("iPhone9,2", "iPhone 7 Plus"),
    ("iPhone9,3", "iPhone 7"),
    ("iPhone9,4", "iPhone 7 Plus"),
    ("j3popltevzw", "J327"),
    ("j3topeltevzw", "J337"),
    ("j7popltevzw", "Galaxy J727"),
    ("j7topeltevzw", "Galaxy J737"),
    ("kievv", "Motorola One 5G UW ace"),
    ("kltevzw", "Galaxy S5"),
    ("komodo", "Pixel 9 Pro XL"),
    ("lynx", "Pixel 7a"),
    ("maui", "Motorolla XT2271-1PP"),
    ("messi", "Moto XT1929"),
    ("nairo", "Moto one 5G"),
    ("nobleltevzw", "Galaxy Note 5"),
    ("o1q", "Galaxy S21"),
    ("oriole", "Pixel 6"),
    ("p3q", "S21 Ultra 5G"),
    ("pa1q", "Galaxy S25"),
    ("pa2q", "Galaxy S25+"),
    ("pa3q", "Galaxy S25 Ultra"),
    ("panther", "Pixel 7"),
    ("psq", "Galaxy S25 Edge"),
    ("q7q", "Galaxy Z Fold7"),
    ("r0q", "Galaxy S22 Ultra"),
    ("r11q", "Galaxy S23 FE"),
    ("r12s", "Galaxy S24 FE"),
    ("r8q", "Galaxy S20 FE 5G UW"),
    ("r9q", "Galaxy S20 FE 5G UW"),
    ("raven", "Pixel 6 Pro"),
    ("redfin", "Pixel 5"),
    ("sargo", "Pixel 3a"),
    ("shiba", "Pixel 8"),
    ("sofia", "XT2041-7"),
    ("sofiap", "XT2043-5"),
    ("star2qltesq", "Galaxy S9+"),
    ("star2qlteue", "Galaxy S9+"),
    ("starqltesq", "Galaxy S9"),
    ("starqlteue", "Galaxy S9"),
    ("sunfish", "Pixel 4a 5G"),
    ("t2q", "Galaxy S21+"),
    ("tegu", "Google Pixel 9a"),
    ("tesla", "Moto edge+ 5G UW (2022)"),
    ("tokay", "Pixel 9"),
    ("tonga", "Moto G Power 2022"),
    ("x1q", "S20 5G UW"),
    ("xcoverpro", "X Cover Pro"),
    ("y2q", "S20+ 5G"),
    ("z3q", "S20 Ultra 5G"),
    ("zerofltevzw", "Galaxy S6"),
    ("zeroltevzw", "Galaxy S7 Edge"),
];
