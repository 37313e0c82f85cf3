/// Parameter form served on `GET /`. Field names match `TreeParams`.
pub const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>treegen</title>
<style>
  body { font-family: sans-serif; max-width: 36em; margin: 2em auto; }
  fieldset { margin-bottom: 1em; }
  label { display: inline-block; width: 14em; }
  input { width: 8em; }
</style>
</head>
<body>
<h1>Tree generator</h1>
<form method="post" action="/">
  <fieldset>
    <legend>Canvas</legend>
    <label for="background_color">Background color</label>
    <input id="background_color" name="background_color" value="white"><br>
    <label for="foreground_color">Foreground color</label>
    <input id="foreground_color" name="foreground_color" value="black"><br>
    <label for="size_x">Width (px)</label>
    <input id="size_x" name="size_x" type="number" min="1" value="1024"><br>
    <label for="size_y">Height (px)</label>
    <input id="size_y" name="size_y" type="number" min="1" value="512">
  </fieldset>
  <fieldset>
    <legend>Trunk</legend>
    <label for="starting_angle">Starting angle (deg)</label>
    <input id="starting_angle" name="starting_angle" type="number" step="any" value="180"><br>
    <label for="starting_length">Starting length</label>
    <input id="starting_length" name="starting_length" type="number" step="any" min="0" value="100"><br>
    <label for="starting_width">Starting width</label>
    <input id="starting_width" name="starting_width" type="number" min="0" value="30">
  </fieldset>
  <fieldset>
    <legend>Growth</legend>
    <label for="branch_chance_mu">Branches per node (mean)</label>
    <input id="branch_chance_mu" name="branch_chance_mu" type="number" step="any" max="5" value="3"><br>
    <label for="branch_chance_sigma">Branches per node (stddev)</label>
    <input id="branch_chance_sigma" name="branch_chance_sigma" type="number" step="any" value="1"><br>
    <label for="angle_variance">Angle variance (deg)</label>
    <input id="angle_variance" name="angle_variance" type="number" step="any" min="0" value="30"><br>
    <label for="shortening_mu">Shortening (mean)</label>
    <input id="shortening_mu" name="shortening_mu" type="number" step="any" value="15"><br>
    <label for="shortening_sigma">Shortening (stddev)</label>
    <input id="shortening_sigma" name="shortening_sigma" type="number" step="any" value="1"><br>
    <label for="thinning_mu">Thinning (mean)</label>
    <input id="thinning_mu" name="thinning_mu" type="number" step="any" value="5"><br>
    <label for="thinning_sigma">Thinning (stddev)</label>
    <input id="thinning_sigma" name="thinning_sigma" type="number" step="any" value="1">
  </fieldset>
  <fieldset>
    <legend>Limits</legend>
    <label for="max_length">Max path length</label>
    <input id="max_length" name="max_length" type="number" step="any" min="0" value="400"><br>
    <label for="min_width">Min width</label>
    <input id="min_width" name="min_width" type="number" min="0" value="5"><br>
    <label for="min_length">Min length</label>
    <input id="min_length" name="min_length" type="number" step="any" min="0" value="0"><br>
    <label for="min_angle">Min angle (deg)</label>
    <input id="min_angle" name="min_angle" type="number" step="any" value="90"><br>
    <label for="max_angle">Max angle (deg)</label>
    <input id="max_angle" name="max_angle" type="number" step="any" value="270"><br>
    <label for="seed">Seed (optional)</label>
    <input id="seed" name="seed" type="number" min="0">
  </fieldset>
  <button type="submit">Grow</button>
</form>
</body>
</html>
"#;
